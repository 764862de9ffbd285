//! Programmed results handed back by the mock.

use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use crate::ports::PortError;

/// Closure producing a result from the call's path.
pub(crate) type ComputeFn<O> = Arc<dyn Fn(&Path) -> Result<O, PortError> + Send + Sync>;

/// Closure producing the same literal result on every call.
pub(crate) type LiteralFn<O> = Arc<dyn Fn() -> Result<O, PortError> + Send + Sync>;

/// A result programmed on an expectation.
pub(crate) enum Returns<O> {
    /// Fixed value, handed out on every matching call.
    Literal(LiteralFn<O>),
    /// Value handed to the first matching call only.
    Once(Option<Result<O, PortError>>),
    /// Value computed from the path of each matching call.
    Computed(ComputeFn<O>),
}

impl<O> Returns<O> {
    /// Short label used in expectation summaries.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Once(_) => "once",
            Self::Computed(_) => "computed",
        }
    }

    /// Takes what is needed to produce the result, so that closures run
    /// after the mock's lock is released.
    pub(crate) fn pending(&mut self) -> Pending<O> {
        match self {
            Self::Literal(f) => Pending::Literal(Arc::clone(f)),
            Self::Once(slot) => slot.take().map_or(Pending::Spent, Pending::Ready),
            Self::Computed(f) => Pending::Computed(Arc::clone(f)),
        }
    }
}

/// A result taken out of an expectation, not yet resolved.
pub(crate) enum Pending<O> {
    Literal(LiteralFn<O>),
    Ready(Result<O, PortError>),
    Computed(ComputeFn<O>),
    /// A one-shot value that was already handed out.
    Spent,
}

impl<O> Pending<O> {
    /// Produces the result, or `None` for a spent one-shot value.
    pub(crate) fn resolve(self, path: &Path) -> Option<Result<O, PortError>> {
        match self {
            Self::Literal(f) => Some(f()),
            Self::Ready(result) => Some(result),
            Self::Computed(f) => Some(f(path)),
            Self::Spent => None,
        }
    }
}

/// An error programmed as part of an expectation's result.
///
/// Handed to the caller as a [`std::io::Error`] with the same kind and
/// message, so code under test can downcast it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgrammedError {
    kind: io::ErrorKind,
    message: String,
}

impl ProgrammedError {
    /// Error of the given kind.
    pub fn new(kind: io::ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    /// `NotFound` error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(io::ErrorKind::NotFound, message)
    }

    /// `PermissionDenied` error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(io::ErrorKind::PermissionDenied, message)
    }

    /// `StorageFull` error.
    pub fn storage_full(message: impl Into<String>) -> Self {
        Self::new(io::ErrorKind::StorageFull, message)
    }

    /// `Other` error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(io::ErrorKind::Other, message)
    }

    /// Kind of the error handed to callers.
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        self.kind
    }

    /// Message of the error handed to callers.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Builds the error value returned from a port call.
    #[must_use]
    pub fn to_port_error(&self) -> PortError {
        Box::new(io::Error::new(self.kind, self.message.clone()))
    }
}

/// In-memory writer whose clones share one buffer.
///
/// Program it as the result of `open_file`, then inspect what the code
/// under test wrote through the clone kept by the test.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    /// Empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far, across all clones.
    #[must_use]
    pub fn contents(&self) -> Vec<u8> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Bytes written so far, decoded lossily as UTF-8.
    #[must_use]
    pub fn contents_string(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
