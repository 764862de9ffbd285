//! Call log data structures.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ports::Operation;

/// Errors raised while loading a call log.
#[derive(Debug, thiserror::Error)]
pub enum CallLogError {
    /// The file could not be read.
    #[error("failed to read call log {path}: {source}")]
    Read {
        /// Call log location.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The file is not a valid call log.
    #[error("failed to parse call log {path}: {source}")]
    Parse {
        /// Call log location.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
}

/// A single invocation made against the mock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallRecord {
    /// Sequence number across both port methods (assigned by the recorder).
    pub seq: u64,
    /// Port method invoked.
    pub operation: Operation,
    /// Path argument of the call.
    pub path: String,
    /// Index of the matched expectation; `None` for an unexpected call.
    pub expectation: Option<usize>,
    /// When the call was made.
    pub at: DateTime<Utc>,
}

impl CallRecord {
    /// Returns `true` if no expectation accepted the call.
    #[must_use]
    pub fn is_unexpected(&self) -> bool {
        self.expectation.is_none()
    }
}

/// A complete call log for one mock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallLog {
    /// Unique identifier of the mock that recorded the log.
    pub session: String,
    /// Optional human-readable name given to the mock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// When the log was written.
    pub recorded_at: DateTime<Utc>,
    /// Calls in invocation order.
    pub calls: Vec<CallRecord>,
}

impl CallLog {
    /// Load a call log from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CallLogError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| CallLogError::Read { path: path.to_path_buf(), source })?;
        serde_yaml::from_str(&content)
            .map_err(|source| CallLogError::Parse { path: path.to_path_buf(), source })
    }

    /// Calls that matched no expectation.
    pub fn unexpected(&self) -> impl Iterator<Item = &CallRecord> {
        self.calls.iter().filter(|c| c.is_unexpected())
    }
}
