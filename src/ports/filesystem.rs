//! Filesystem port for opening files for writing and reading files whole.

use std::io::Write;
use std::path::Path;

/// Error type returned by every port method.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// A caller-owned sink returned by [`FileSystem::open_file`].
///
/// The file is released when the writer is dropped.
pub type Writer = Box<dyn Write + Send>;

/// Provides filesystem access for writing and reading files.
///
/// Abstracting the filesystem lets callers run against a programmed test
/// double instead of the real disk.
pub trait FileSystem: Send + Sync {
    /// Opens the file at `path` for writing.
    ///
    /// # Errors
    ///
    /// Returns an implementation-defined error if the file cannot be opened;
    /// no writer is handed out in that case.
    fn open_file(&self, path: &Path) -> Result<Writer, PortError>;

    /// Reads the entire contents of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read. There are no partial
    /// reads.
    fn read_file(&self, path: &Path) -> Result<Vec<u8>, PortError>;
}

impl<F: FileSystem + ?Sized> FileSystem for &F {
    fn open_file(&self, path: &Path) -> Result<Writer, PortError> {
        (**self).open_file(path)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>, PortError> {
        (**self).read_file(path)
    }
}

impl<F: FileSystem + ?Sized> FileSystem for Box<F> {
    fn open_file(&self, path: &Path) -> Result<Writer, PortError> {
        (**self).open_file(path)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>, PortError> {
        (**self).read_file(path)
    }
}

impl<F: FileSystem + ?Sized> FileSystem for std::sync::Arc<F> {
    fn open_file(&self, path: &Path) -> Result<Writer, PortError> {
        (**self).open_file(path)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>, PortError> {
        (**self).read_file(path)
    }
}

/// Identifies a [`FileSystem`] method in call logs, scripts and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// [`FileSystem::open_file`].
    OpenFile,
    /// [`FileSystem::read_file`].
    ReadFile,
}

impl Operation {
    /// Method name as it appears in diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenFile => "open_file",
            Self::ReadFile => "read_file",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
