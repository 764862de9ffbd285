//! Argument matchers deciding whether a call satisfies an expectation.

use std::fmt;
use std::path::{Path, PathBuf};

/// Predicate over the path argument of a port call.
pub trait Matcher: Send + Sync {
    /// Returns `true` if a call with `path` satisfies this matcher.
    fn matches(&self, path: &Path) -> bool;

    /// Human-readable form used in diagnostics.
    fn describe(&self) -> String;
}

/// Matches every path.
#[derive(Debug, Clone, Copy, Default)]
pub struct Any;

impl Matcher for Any {
    fn matches(&self, _path: &Path) -> bool {
        true
    }

    fn describe(&self) -> String {
        "any path".to_string()
    }
}

/// Matches one exact path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equals(pub PathBuf);

impl Matcher for Equals {
    fn matches(&self, path: &Path) -> bool {
        self.0 == path
    }

    fn describe(&self) -> String {
        format!("path == {:?}", self.0.display().to_string())
    }
}

/// Matches paths accepted by a closure.
pub struct Predicate<F> {
    description: String,
    predicate: F,
}

impl<F> Predicate<F>
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    /// Wraps `predicate`; `description` shows up in failure reports.
    pub fn new(description: impl Into<String>, predicate: F) -> Self {
        Self { description: description.into(), predicate }
    }
}

impl<F> Matcher for Predicate<F>
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn matches(&self, path: &Path) -> bool {
        (self.predicate)(path)
    }

    fn describe(&self) -> String {
        format!("path where {}", self.description)
    }
}

impl<F> fmt::Debug for Predicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("description", &self.description).finish_non_exhaustive()
    }
}

/// Matcher accepting any path.
#[must_use]
pub fn any() -> Any {
    Any
}

/// Matcher accepting exactly `path`.
pub fn eq(path: impl AsRef<Path>) -> Equals {
    Equals(path.as_ref().to_path_buf())
}
