//! Persisted user settings stored in `$DRAFT_HOME/config.toml`.
pub mod store;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use store::{load, save};

/// Flat string-keyed configuration.
///
/// Decoded from a TOML document whose top level holds only string values,
/// e.g. `registry = "example.azurecr.io"`. Nested tables or non-string
/// values are rejected by the decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(BTreeMap<String, String>);

impl Config {
    /// Look up a single setting.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no settings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over settings in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Config {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Outcome of a successful [`load`].
///
/// A missing file is a normal first-run state and is reported as
/// [`ConfigState::Absent`]; failures are the `Err` side of the load result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigState {
    /// No config file exists under the home directory.
    #[default]
    Absent,
    /// The config file was read and decoded.
    Loaded(Config),
}

impl ConfigState {
    /// The loaded config, if any.
    #[must_use]
    pub const fn config(&self) -> Option<&Config> {
        match self {
            Self::Absent => None,
            Self::Loaded(config) => Some(config),
        }
    }

    /// Look up a setting, treating an absent file as having no settings.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.config().and_then(|c| c.get(key))
    }

    /// Whether a config file was found.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}
