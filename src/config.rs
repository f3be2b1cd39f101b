use serde::Deserialize;

/// Element a page can embed its TOML config in, as
/// `<script type="application/toml" id="share-config">`.
pub const EMBEDDED_CONFIG: &str = "script#share-config";

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ShareConfig {
    pub site: SiteConfig,
    pub selectors: Selectors,
    pub notices: Notices,
}

impl ShareConfig {
    /// Config embedded in the page, or the default when the page carries none.
    #[tracing::instrument(skip_all, name = "config")]
    pub fn from_embedded(toml: Option<&str>) -> Result<Self, Error> {
        match toml {
            Some(toml) => {
                tracing::debug!("reading embedded config");
                Self::from_toml(toml)
            }
            None => {
                tracing::debug!("no embedded config, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_toml(toml: &str) -> Result<Self, Error> {
        ::config::Config::builder()
            .add_source(::config::File::from_str(toml, ::config::FileFormat::Toml))
            .build()
            .map_err(Error::Read)?
            .try_deserialize()
            .map_err(Error::Parse)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config read error: {0}")]
    Read(::config::ConfigError),

    #[error("parsing error: {0}")]
    Parse(::config::ConfigError),
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SiteConfig {
    /// Product name, used as the share title.
    pub title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "WartaPureté".to_owned(),
        }
    }
}

/// Where a score page displays each piece of a score.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Selectors {
    pub trigger: String,
    pub player_name: String,
    pub trashness: String,
    pub sex: String,
    pub alcohol: String,
    pub drugs: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            trigger: "#share-icon".to_owned(),
            player_name: "#player-name".to_owned(),
            trashness: "#points-trashness".to_owned(),
            sex: "#points-sex".to_owned(),
            alcohol: "#points-alcohol".to_owned(),
            drugs: "#points-drugs".to_owned(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Notices {
    pub copied: String,
    pub prompt: String,
}

impl Default for Notices {
    fn default() -> Self {
        Self {
            copied: "Lien copié !".to_owned(),
            prompt: "Copie ce lien:".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::{Error, ShareConfig};

    #[test]
    fn empty_is_default() {
        let config = ShareConfig::from_toml("").expect("empty config should parse");
        assert_eq!(config, ShareConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = ShareConfig::from_toml(
            r##"
            [site]
            title = "WartaPureté (beta)"

            [selectors]
            player_name = "#name"

            [notices]
            copied = "Copied!"
            "##,
        )
        .expect("config should parse");

        assert_eq!(config.site.title, "WartaPureté (beta)");
        assert_eq!(config.selectors.player_name, "#name");
        assert_eq!(config.selectors.drugs, "#points-drugs");
        assert_eq!(config.notices.copied, "Copied!");
        assert_eq!(config.notices.prompt, "Copie ce lien:");
    }

    #[test]
    fn wrong_shape() {
        let err = ShareConfig::from_toml(r#"notices = "Copied!""#)
            .expect_err("notices should be a table");

        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn broken_toml() {
        let err = ShareConfig::from_toml("[site").expect_err("toml is unterminated");
        assert!(matches!(err, Error::Read(_)));
    }

    #[test]
    #[traced_test]
    fn embedded_config_is_used() {
        let config = ShareConfig::from_embedded(Some(
            r##"
            [selectors]
            trigger = "#share"
            "##,
        ))
        .expect("embedded config should parse");

        assert_eq!(config.selectors.trigger, "#share");
        assert!(logs_contain("reading embedded config"));
    }

    #[test]
    #[traced_test]
    fn no_embedded_config_is_default() {
        let config = ShareConfig::from_embedded(None).expect("default needs no parsing");

        assert_eq!(config, ShareConfig::default());
        assert!(logs_contain("no embedded config, using defaults"));
    }

    #[test]
    fn broken_embedded_config_is_an_error() {
        assert!(ShareConfig::from_embedded(Some("[site")).is_err());
    }
}
