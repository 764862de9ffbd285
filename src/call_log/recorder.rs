//! Records calls and writes them as a YAML call log.

use std::path::{Path, PathBuf};

use chrono::Utc;

use super::format::{CallLog, CallRecord};
use crate::ports::Operation;

/// Append-only recorder of calls made against one mock.
#[derive(Debug)]
pub struct CallLogRecorder {
    session: String,
    name: Option<String>,
    calls: Vec<CallRecord>,
    next_seq: u64,
}

impl CallLogRecorder {
    /// Create a recorder with a fresh session identifier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            session: uuid::Uuid::new_v4().to_string(),
            name: None,
            calls: Vec::new(),
            next_seq: 0,
        }
    }

    /// Attach a human-readable name to the log.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Session identifier, also used as the log's file stem.
    #[must_use]
    pub fn session(&self) -> &str {
        &self.session
    }

    /// Record a call. The `seq` and `at` fields are assigned automatically.
    pub fn record(
        &mut self,
        operation: Operation,
        path: &Path,
        expectation: Option<usize>,
    ) -> &CallRecord {
        let record = CallRecord {
            seq: self.next_seq,
            operation,
            path: path.display().to_string(),
            expectation,
            at: Utc::now(),
        };
        self.next_seq += 1;
        self.calls.push(record);
        &self.calls[self.calls.len() - 1]
    }

    /// Calls recorded so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[CallRecord] {
        &self.calls
    }

    /// Write the log to `<dir>/<session>.calls.yaml`, creating `dir` if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn finish(&self, dir: &Path) -> Result<PathBuf, std::io::Error> {
        let log = CallLog {
            session: self.session.clone(),
            name: self.name.clone(),
            recorded_at: Utc::now(),
            calls: self.calls.clone(),
        };
        let yaml = serde_yaml::to_string(&log).map_err(std::io::Error::other)?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.calls.yaml", self.session));
        std::fs::write(&path, yaml)?;
        Ok(path)
    }
}

impl Default for CallLogRecorder {
    fn default() -> Self {
        Self::new()
    }
}
