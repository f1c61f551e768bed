use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scheduler::SchedulerConfig;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Limits for a single review session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Most cards a session will select from its deck.
    pub max_cards: usize,
    /// Knowledge level at which a card counts as learned.
    pub learned_threshold: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_cards: 20,
            learned_threshold: 80,
        }
    }
}

impl SessionConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `max_cards` is zero or
    /// `learned_threshold` is above 100.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cards == 0 {
            return Err(ConfigError::Invalid(
                "session.max_cards must be at least 1".into(),
            ));
        }
        if self.learned_threshold > 100 {
            return Err(ConfigError::Invalid(format!(
                "session.learned_threshold must be at most 100, got {}",
                self.learned_threshold
            )));
        }
        Ok(())
    }
}

/// Top-level settings, loadable from TOML.
///
/// Every field has a default, so an empty document is a valid config:
///
/// ```toml
/// [scheduler]
/// min_ease_factor = 1.3
/// second_interval_days = 6
///
/// [session]
/// max_cards = 20
/// learned_threshold = 80
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SrsConfig {
    pub scheduler: SchedulerConfig,
    pub session: SessionConfig,
}

impl SrsConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML and
    /// `ConfigError::Invalid` when a value is out of range.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise the
    /// same errors as [`SrsConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scheduler
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.session.validate()
    }
}
