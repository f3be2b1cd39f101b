use std::{
    fmt,
    iter::Sum,
    ops::{Add, Index},
};

use crate::{
    config::Selectors,
    platform::{Page, PageError},
};

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Trashness,
    Sex,
    Alcohol,
    Drugs,
}

impl Category {
    /// Display order, as shown on a score page.
    pub const ALL: [Self; 4] = [Self::Trashness, Self::Sex, Self::Alcohol, Self::Drugs];

    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Trashness => "🗑️",
            Self::Sex => "💑",
            Self::Alcohol => "🍺",
            Self::Drugs => "💊",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Trashness => "Trashness",
            Self::Sex => "Sexe",
            Self::Alcohol => "Alcool",
            Self::Drugs => "Drogues",
        }
    }

    const fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Points per category.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct Score {
    points: [i32; 4],
}

impl Score {
    pub const fn new(trashness: i32, sex: i32, alcohol: i32, drugs: i32) -> Self {
        Self {
            points: [trashness, sex, alcohol, drugs],
        }
    }
}

impl Index<Category> for Score {
    type Output = i32;

    fn index(&self, index: Category) -> &Self::Output {
        &self.points[index.position()]
    }
}

impl Add for Score {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            points: std::array::from_fn(|i| self.points[i] + rhs.points[i]),
        }
    }
}

impl Sum for Score {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// What a score page currently displays, taken verbatim.
///
/// Points are kept as text: whatever the page shows is what gets shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreSnapshot {
    pub player_name: String,
    pub trashness: String,
    pub sex: String,
    pub alcohol: String,
    pub drugs: String,
}

impl ScoreSnapshot {
    /// Reads the player name and the four point fields from `page`.
    ///
    /// Every field must be present; a missing one is an error, never an empty string.
    #[tracing::instrument(skip_all)]
    pub fn read(page: &impl Page, selectors: &Selectors) -> Result<Self, PageError> {
        let field = |selector: &str| {
            page.text_content(selector).ok_or_else(|| {
                tracing::error!(selector, "score page is missing a field");
                PageError::missing_field(selector)
            })
        };

        let snapshot = Self {
            player_name: field(selectors.player_name.as_str())?,
            trashness: field(selectors.trashness.as_str())?,
            sex: field(selectors.sex.as_str())?,
            alcohol: field(selectors.alcohol.as_str())?,
            drugs: field(selectors.drugs.as_str())?,
        };

        tracing::trace!(?snapshot);

        Ok(snapshot)
    }

    pub fn points(&self, category: Category) -> &str {
        match category {
            Category::Trashness => &self.trashness,
            Category::Sex => &self.sex,
            Category::Alcohol => &self.alcohol,
            Category::Drugs => &self.drugs,
        }
    }
}

impl From<(&str, Score)> for ScoreSnapshot {
    fn from((player_name, score): (&str, Score)) -> Self {
        Self {
            player_name: player_name.to_owned(),
            trashness: score[Category::Trashness].to_string(),
            sex: score[Category::Sex].to_string(),
            alcohol: score[Category::Alcohol].to_string(),
            drugs: score[Category::Drugs].to_string(),
        }
    }
}
