//! Declarative expectation scripts.
//!
//! A script is a YAML document listing expectations with literal results:
//!
//! ```yaml
//! name: export-cmake
//! strictness: strict
//! expectations:
//!   - op: read_file
//!     path: BUILD.bazel
//!     returns: { ok: "cc_library(name = \"core\")" }
//!   - op: open_file
//!     path: CMakeLists.txt
//!     returns: { writer: true }
//!   - op: open_file
//!     path: full.txt
//!     times: { at_least: 1 }
//!     returns: { err: { kind: storage_full, message: disk full } }
//! ```

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::Strictness;
use crate::mock::{MemoryWriter, MockFileSystem, ProgrammedError, Times};
use crate::ports::Operation;

/// Errors raised while loading or applying a script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The script file could not be read.
    #[error("failed to read script {path}: {source}")]
    Read {
        /// Script location.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The script is not valid YAML for this format.
    #[error("failed to parse script {origin}: {source}")]
    Parse {
        /// Script location, or `<inline>`.
        origin: String,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
    /// An entry is inconsistent.
    #[error("expectation #{index} is invalid: {reason}")]
    Invalid {
        /// Position of the entry in the script.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },
}

/// Call-count constraint as written in a script. Absent means exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptedTimes {
    /// Exact count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exactly: Option<usize>,
    /// Lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_least: Option<usize>,
    /// Upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_most: Option<usize>,
    /// Any number of calls.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub any: bool,
}

impl ScriptedTimes {
    fn to_times(&self) -> Result<Times, String> {
        match (self.exactly, self.at_least, self.at_most, self.any) {
            (None, None, None, false) => Ok(Times::default()),
            (Some(n), None, None, false) => Ok(Times::Exactly(n)),
            (None, Some(min), None, false) => Ok(Times::AtLeast(min)),
            (None, None, Some(max), false) => Ok(Times::AtMost(max)),
            (None, Some(min), Some(max), false) if min <= max => Ok(Times::Between(min, max)),
            (None, Some(min), Some(max), false) => {
                Err(format!("at_least ({min}) is greater than at_most ({max})"))
            }
            (None, None, None, true) => Ok(Times::Any),
            _ => Err("times combines incompatible constraints".to_string()),
        }
    }
}

/// Error result as written in a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptedError {
    /// Snake-case error kind, e.g. `not_found` or `storage_full`.
    #[serde(default = "default_error_kind")]
    pub kind: String,
    /// Error message.
    pub message: String,
}

fn default_error_kind() -> String {
    "other".to_string()
}

impl ScriptedError {
    fn to_programmed(&self) -> Result<ProgrammedError, String> {
        let kind = match self.kind.as_str() {
            "not_found" => io::ErrorKind::NotFound,
            "permission_denied" => io::ErrorKind::PermissionDenied,
            "already_exists" => io::ErrorKind::AlreadyExists,
            "invalid_input" => io::ErrorKind::InvalidInput,
            "storage_full" => io::ErrorKind::StorageFull,
            "other" => io::ErrorKind::Other,
            other => return Err(format!("unknown error kind {other:?}")),
        };
        Ok(ProgrammedError::new(kind, self.message.clone()))
    }
}

/// Result as written in a script; exactly one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptedReturn {
    /// UTF-8 contents returned by `read_file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<String>,
    /// Raw bytes returned by `read_file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<Vec<u8>>,
    /// Hand a fresh in-memory writer to `open_file`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub writer: bool,
    /// Error returned by either operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<ScriptedError>,
}

/// One expectation entry of a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptedExpectation {
    /// Port method.
    pub op: Operation,
    /// Exact path to match; absent matches any path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Call-count constraint.
    #[serde(default)]
    pub times: ScriptedTimes,
    /// Programmed result; absent means calls panic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<ScriptedReturn>,
}

/// Validated result of a single entry.
enum Planned {
    Bytes(Vec<u8>),
    Writer,
    Error(ProgrammedError),
}

impl ScriptedExpectation {
    fn plan(&self) -> Result<(Times, Option<Planned>), String> {
        let times = self.times.to_times()?;
        let Some(returns) = &self.returns else {
            return Ok((times, None));
        };
        let planned = match (self.op, returns) {
            (_, ScriptedReturn { ok: None, bytes: None, writer: false, err: Some(err) }) => {
                Planned::Error(err.to_programmed()?)
            }
            (
                Operation::ReadFile,
                ScriptedReturn { ok: Some(text), bytes: None, writer: false, err: None },
            ) => Planned::Bytes(text.clone().into_bytes()),
            (
                Operation::ReadFile,
                ScriptedReturn { ok: None, bytes: Some(bytes), writer: false, err: None },
            ) => Planned::Bytes(bytes.clone()),
            (
                Operation::OpenFile,
                ScriptedReturn { ok: None, bytes: None, writer: true, err: None },
            ) => Planned::Writer,
            (Operation::ReadFile, _) => {
                return Err("read_file returns exactly one of ok, bytes or err".to_string())
            }
            (Operation::OpenFile, _) => {
                return Err("open_file returns exactly one of writer or err".to_string())
            }
        };
        Ok((times, Some(planned)))
    }
}

/// A named list of expectations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectationScript {
    /// Script name, used to name the mock's call log.
    pub name: String,
    /// Strictness of mocks built by [`ExpectationScript::build_mock`].
    #[serde(default)]
    pub strictness: Strictness,
    /// Entries in registration order.
    pub expectations: Vec<ScriptedExpectation>,
}

impl ExpectationScript {
    /// Load a script from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ScriptError::Read { path: path.to_path_buf(), source })?;
        serde_yaml::from_str(&content)
            .map_err(|source| ScriptError::Parse { origin: path.display().to_string(), source })
    }

    /// Parse a script from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid script.
    pub fn from_yaml(yaml: &str) -> Result<Self, ScriptError> {
        serde_yaml::from_str(yaml)
            .map_err(|source| ScriptError::Parse { origin: "<inline>".to_string(), source })
    }

    /// Register every entry on `mock`.
    ///
    /// All entries are validated before any is registered. Returns the
    /// writers handed out by `open_file` entries, keyed by entry position.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry is inconsistent.
    pub fn program(
        &self,
        mock: &MockFileSystem,
    ) -> Result<BTreeMap<usize, MemoryWriter>, ScriptError> {
        let plans = self
            .expectations
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                entry.plan().map_err(|reason| ScriptError::Invalid { index, reason })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut writers = BTreeMap::new();
        for (index, (entry, (times, planned))) in self.expectations.iter().zip(plans).enumerate() {
            match entry.op {
                Operation::OpenFile => {
                    let mut builder = mock.expect_open_file().times(times);
                    if let Some(path) = &entry.path {
                        builder = builder.with_path(path);
                    }
                    match planned {
                        Some(Planned::Writer) => {
                            let writer = MemoryWriter::new();
                            builder.return_writer(writer.clone());
                            writers.insert(index, writer);
                        }
                        Some(Planned::Error(err)) => {
                            builder.return_error(err);
                        }
                        Some(Planned::Bytes(_)) | None => {}
                    }
                }
                Operation::ReadFile => {
                    let mut builder = mock.expect_read_file().times(times);
                    if let Some(path) = &entry.path {
                        builder = builder.with_path(path);
                    }
                    match planned {
                        Some(Planned::Bytes(bytes)) => {
                            builder.return_bytes(bytes);
                        }
                        Some(Planned::Error(err)) => {
                            builder.return_error(err);
                        }
                        Some(Planned::Writer) | None => {}
                    }
                }
            }
        }
        tracing::debug!(script = %self.name, count = self.expectations.len(), "script programmed");
        Ok(writers)
    }

    /// Build a mock with this script's name and strictness and program it.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry is inconsistent.
    pub fn build_mock(
        &self,
    ) -> Result<(MockFileSystem, BTreeMap<usize, MemoryWriter>), ScriptError> {
        let mock = match self.strictness {
            Strictness::Strict => MockFileSystem::new().strict(),
            Strictness::Lenient => MockFileSystem::new().lenient(),
        }
        .named(&self.name);
        match self.program(&mock) {
            Ok(writers) => Ok((mock, writers)),
            Err(e) => {
                let _ = mock.checkpoint();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::ports::FileSystem;

    const EXPORT_SCRIPT: &str = r#"
name: export-cmake
expectations:
  - op: read_file
    path: BUILD.bazel
    returns: { ok: "cc_library(name = \"core\")" }
  - op: open_file
    path: CMakeLists.txt
    returns: { writer: true }
  - op: open_file
    path: full.txt
    times: { at_least: 1 }
    returns: { err: { kind: storage_full, message: disk full } }
"#;

    #[test]
    fn parses_and_programs_mock() {
        let script = ExpectationScript::from_yaml(EXPORT_SCRIPT).unwrap();
        assert_eq!(script.strictness, Strictness::Strict);
        assert_eq!(script.expectations.len(), 3);

        let (fs, writers) = script.build_mock().unwrap();
        assert_eq!(
            fs.read_file(Path::new("BUILD.bazel")).unwrap(),
            br#"cc_library(name = "core")"#
        );

        fs.open_file(Path::new("CMakeLists.txt")).unwrap().write_all(b"project(core)").unwrap();
        assert_eq!(writers[&1].contents_string(), "project(core)");

        let err = fs.open_file(Path::new("full.txt")).err().unwrap();
        let io_err = err.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io_err.kind(), io::ErrorKind::StorageFull);
        assert!(fs.verify().is_ok());
    }

    #[test]
    fn absent_path_matches_any_and_times_default_once() {
        let script = ExpectationScript::from_yaml(
            "name: any\nstrictness: lenient\nexpectations:\n  - op: read_file\n    returns: { bytes: [104, 105] }\n",
        )
        .unwrap();
        let (fs, _) = script.build_mock().unwrap();
        let summary = &fs.expectations()[0];
        assert_eq!(summary.matcher, "any path");
        assert_eq!(summary.times, Times::Exactly(1));
        assert_eq!(fs.read_file(Path::new("whatever")).unwrap(), b"hi");
        assert!(fs.read_file(Path::new("again")).is_err());
        let _ = fs.checkpoint();
    }

    #[test]
    fn rejects_writer_on_read_file() {
        let script = ExpectationScript::from_yaml(
            "name: bad\nexpectations:\n  - op: read_file\n    returns: { writer: true }\n",
        )
        .unwrap();
        let err = script.build_mock().err().unwrap();
        assert!(matches!(err, ScriptError::Invalid { index: 0, .. }));
    }

    #[test]
    fn rejects_conflicting_times() {
        let script = ExpectationScript::from_yaml(
            "name: bad\nexpectations:\n  - op: open_file\n    times: { exactly: 1, any: true }\n    returns: { writer: true }\n",
        )
        .unwrap();
        let mock = MockFileSystem::new();
        let err = script.program(&mock).unwrap_err();
        assert!(err.to_string().contains("incompatible"));
        assert!(mock.expectations().is_empty());
    }

    #[test]
    fn rejects_unknown_error_kind() {
        let script = ExpectationScript::from_yaml(
            "name: bad\nexpectations:\n  - op: read_file\n    returns: { err: { kind: exploded, message: boom } }\n",
        )
        .unwrap();
        let err = script.program(&MockFileSystem::new()).unwrap_err();
        assert!(err.to_string().contains("unknown error kind"));
    }

    #[test]
    fn unknown_fields_fail_to_parse() {
        let err =
            ExpectationScript::from_yaml("name: x\nexpectations: []\nextra: 1\n").unwrap_err();
        assert!(matches!(err, ScriptError::Parse { .. }));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ExpectationScript::load(Path::new("/nonexistent/script.yaml")).unwrap_err();
        assert!(matches!(err, ScriptError::Read { .. }));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.yaml");
        std::fs::write(&path, EXPORT_SCRIPT).unwrap();
        let script = ExpectationScript::load(&path).unwrap();
        assert_eq!(script.name, "export-cmake");
    }
}
