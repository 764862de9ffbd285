//! Environment-driven defaults for mocks.
//!
//! `FSPORT_STRICTNESS` selects how unexpected calls are handled and
//! `FSPORT_CALL_LOG` names a directory that receives each mock's call log
//! at teardown. Both may also come from a `.env` file.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Environment variable selecting [`Strictness`].
pub const STRICTNESS_VAR: &str = "FSPORT_STRICTNESS";

/// Environment variable naming the call log directory.
pub const CALL_LOG_VAR: &str = "FSPORT_CALL_LOG";

/// How a mock reacts to a call that matches no expectation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// Panic immediately.
    #[default]
    Strict,
    /// Return an error to the caller and fail at teardown.
    Lenient,
}

impl FromStr for Strictness {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(ConfigError::InvalidStrictness(other.to_string())),
        }
    }
}

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `FSPORT_STRICTNESS` holds an unknown value.
    #[error("invalid FSPORT_STRICTNESS value {0:?}: expected \"strict\" or \"lenient\"")]
    InvalidStrictness(String),
}

/// Settings applied to a mock at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockConfig {
    /// Reaction to unexpected calls.
    pub strictness: Strictness,
    /// Directory receiving the call log at teardown, if any.
    pub call_log_dir: Option<PathBuf>,
}

impl MockConfig {
    /// Read configuration from the process environment, loading `.env` first.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let strictness = match lookup(STRICTNESS_VAR) {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => Strictness::default(),
        };
        let call_log_dir =
            lookup(CALL_LOG_VAR).filter(|value| !value.trim().is_empty()).map(PathBuf::from);
        Ok(Self { strictness, call_log_dir })
    }
}
