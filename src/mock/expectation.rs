//! Expectations and the builder used to program them.

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use super::matcher::{self, Matcher, Predicate};
use super::returns::{MemoryWriter, ProgrammedError, Returns};
use super::times::Times;
use super::MockFileSystem;
use crate::ports::{Operation, PortError, Writer};

/// Progress of a single expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectationState {
    /// Not called yet and still needs calls.
    Pending,
    /// Called, but fewer times than required.
    PartiallySatisfied,
    /// Call count is within the constraint.
    Satisfied,
    /// A matching call arrived after the expectation was exhausted.
    Violated,
}

impl fmt::Display for ExpectationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::PartiallySatisfied => "partially satisfied",
            Self::Satisfied => "satisfied",
            Self::Violated => "violated",
        })
    }
}

/// One programmed rule for a port method.
pub struct Expectation<O> {
    pub(crate) matcher: Box<dyn Matcher>,
    pub(crate) times: Times,
    pub(crate) returns: Option<Returns<O>>,
    pub(crate) calls: usize,
    pub(crate) violated: bool,
}

impl<O> Expectation<O> {
    pub(crate) fn new() -> Self {
        Self {
            matcher: Box::new(matcher::any()),
            times: Times::default(),
            returns: None,
            calls: 0,
            violated: false,
        }
    }

    pub(crate) fn accepts(&self, path: &Path) -> bool {
        self.matcher.matches(path)
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.times.is_exhausted(self.calls)
    }

    pub(crate) fn state(&self) -> ExpectationState {
        if self.violated {
            ExpectationState::Violated
        } else if self.times.is_satisfied(self.calls) {
            ExpectationState::Satisfied
        } else if self.calls == 0 {
            ExpectationState::Pending
        } else {
            ExpectationState::PartiallySatisfied
        }
    }

    pub(crate) fn summary(&self, operation: Operation, index: usize) -> ExpectationSummary {
        ExpectationSummary {
            operation,
            index,
            matcher: self.matcher.describe(),
            times: self.times,
            calls: self.calls,
            returns: self.returns.as_ref().map(Returns::kind),
            state: self.state(),
        }
    }
}

/// Expectations of both port methods, in registration order.
#[derive(Default)]
pub struct ExpectationSet {
    pub(crate) open_file: Vec<Expectation<Writer>>,
    pub(crate) read_file: Vec<Expectation<Vec<u8>>>,
}

impl ExpectationSet {
    pub(crate) fn summaries(&self) -> Vec<ExpectationSummary> {
        let open = self
            .open_file
            .iter()
            .enumerate()
            .map(|(i, e)| e.summary(Operation::OpenFile, i));
        let read = self
            .read_file
            .iter()
            .enumerate()
            .map(|(i, e)| e.summary(Operation::ReadFile, i));
        open.chain(read).collect()
    }

    pub(crate) fn clear(&mut self) {
        self.open_file.clear();
        self.read_file.clear();
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for crate::ports::Writer {}
    impl Sealed for Vec<u8> {}
}

/// Success value of a port method, used to pick its expectation list.
pub trait ResultShape: sealed::Sealed + Send + Sized + 'static {
    /// The port method producing this value.
    const OPERATION: Operation;

    #[doc(hidden)]
    fn slot(set: &mut ExpectationSet) -> &mut Vec<Expectation<Self>>;
}

impl ResultShape for Writer {
    const OPERATION: Operation = Operation::OpenFile;

    fn slot(set: &mut ExpectationSet) -> &mut Vec<Expectation<Self>> {
        &mut set.open_file
    }
}

impl ResultShape for Vec<u8> {
    const OPERATION: Operation = Operation::ReadFile;

    fn slot(set: &mut ExpectationSet) -> &mut Vec<Expectation<Self>> {
        &mut set.read_file
    }
}

/// Snapshot of an expectation for reports and listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectationSummary {
    /// Port method the expectation belongs to.
    pub operation: Operation,
    /// Registration index among expectations of the same method.
    pub index: usize,
    /// Matcher description.
    pub matcher: String,
    /// Required call count.
    pub times: Times,
    /// Calls granted so far.
    pub calls: usize,
    /// Kind of programmed result, `None` when nothing was programmed.
    pub returns: Option<&'static str>,
    /// Current state.
    pub state: ExpectationState,
}

impl fmt::Display for ExpectationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{} ({}): expected {}, called {} [{}], returns {}",
            self.operation,
            self.index,
            self.matcher,
            self.times,
            self.calls,
            self.state,
            self.returns.unwrap_or("nothing"),
        )
    }
}

/// Programs one expectation registered on a [`MockFileSystem`].
///
/// The expectation is registered as soon as the builder is created; each
/// method refines it in place.
pub struct ExpectationBuilder<'a, O: ResultShape> {
    mock: &'a MockFileSystem,
    epoch: u64,
    index: usize,
    _shape: PhantomData<fn() -> O>,
}

impl<'a, O: ResultShape> ExpectationBuilder<'a, O> {
    pub(crate) fn new(mock: &'a MockFileSystem, epoch: u64, index: usize) -> Self {
        Self { mock, epoch, index, _shape: PhantomData }
    }

    fn update(self, f: impl FnOnce(&mut Expectation<O>)) -> Self {
        self.mock.update_expectation::<O>(self.epoch, self.index, f);
        self
    }

    /// Registration index among expectations of the same method.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Matches calls whose path equals `path`.
    pub fn with_path(self, path: impl AsRef<Path>) -> Self {
        let matcher = matcher::eq(path);
        self.update(|e| e.matcher = Box::new(matcher))
    }

    /// Matches calls accepted by `matcher`.
    ///
    /// Matchers run while the mock's lock is held, so they must not call
    /// back into the mock. Computed results (`returning`) may.
    pub fn with_matcher(self, matcher: impl Matcher + 'static) -> Self {
        self.update(|e| e.matcher = Box::new(matcher))
    }

    /// Matches calls whose path satisfies `predicate`.
    ///
    /// Like [`with_matcher`](Self::with_matcher), `predicate` must not call
    /// back into the mock.
    pub fn matching<F>(self, description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        let matcher = Predicate::new(description, predicate);
        self.update(|e| e.matcher = Box::new(matcher))
    }

    /// Sets the call-count constraint.
    ///
    /// # Panics
    ///
    /// Panics if `times` is `Between(min, max)` with `min > max`.
    pub fn times(self, times: Times) -> Self {
        if let Times::Between(min, max) = times {
            assert!(
                min <= max,
                "invalid call count for {}: {times} can never be met",
                O::OPERATION
            );
        }
        self.update(|e| e.times = times)
    }

    /// Requires exactly one call.
    pub fn once(self) -> Self {
        self.times(Times::Exactly(1))
    }

    /// Forbids matching calls.
    pub fn never(self) -> Self {
        self.times(Times::Exactly(0))
    }

    /// Computes the result from the path of each matching call.
    pub fn returning<F>(self, f: F) -> Self
    where
        F: Fn(&Path) -> Result<O, PortError> + Send + Sync + 'static,
    {
        self.update(|e| e.returns = Some(Returns::Computed(Arc::new(f))))
    }

    /// Hands `result` to the first matching call; later calls panic.
    pub fn return_once(self, result: Result<O, PortError>) -> Self {
        self.update(|e| e.returns = Some(Returns::Once(Some(result))))
    }

    /// Fails every matching call with `error`.
    pub fn return_error(self, error: ProgrammedError) -> Self {
        self.update(|e| {
            e.returns = Some(Returns::Literal(Arc::new(move || -> Result<O, PortError> {
                Err(error.to_port_error())
            })));
        })
    }
}

impl ExpectationBuilder<'_, Writer> {
    /// Hands a clone of `writer` to every matching call.
    pub fn return_writer(self, writer: MemoryWriter) -> Self {
        self.update(|e| {
            e.returns = Some(Returns::Literal(Arc::new(move || -> Result<Writer, PortError> {
                Ok(Box::new(writer.clone()))
            })));
        })
    }
}

impl ExpectationBuilder<'_, Vec<u8>> {
    /// Hands a copy of `bytes` to every matching call.
    pub fn return_bytes(self, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        self.update(|e| {
            e.returns = Some(Returns::Literal(Arc::new(move || -> Result<Vec<u8>, PortError> {
                Ok(bytes.clone())
            })));
        })
    }
}
