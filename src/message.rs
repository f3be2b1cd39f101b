use std::fmt::Write;

use url::Url;

use crate::score::{Category, ScoreSnapshot};

/// The payload handed to whichever delivery ends up being used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareMessage {
    pub title: String,
    pub text: String,
    pub url: Url,
}

impl ShareMessage {
    pub fn compose(title: &str, snapshot: &ScoreSnapshot, url: Url) -> Self {
        Self {
            title: title.to_owned(),
            text: Self::text(title, snapshot),
            url,
        }
    }

    fn text(title: &str, snapshot: &ScoreSnapshot) -> String {
        let mut text = format!(
            "{name} a obtenu ce score à {title} :",
            name = snapshot.player_name
        );

        for category in Category::ALL {
            // writing to a String can't fail
            let _ = write!(
                text,
                "\n{emoji} {label} : {points} pts",
                emoji = category.emoji(),
                label = category.label(),
                points = snapshot.points(category),
            );
        }

        text
    }
}
