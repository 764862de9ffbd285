//! Expectation-driven test double for the `FileSystem` port.
//!
//! A test programs expectations on a [`MockFileSystem`], hands it to the
//! code under test wherever a [`FileSystem`] is required, and the mock
//! verifies every expectation when it goes out of scope.
//!
//! Calls nobody expected and expectations without a programmed result are
//! programmer errors and panic at the call site. Expectations that were
//! never met are collected and reported together at teardown.

mod expectation;
pub mod matcher;
mod report;
mod returns;
mod times;

use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub use expectation::{ExpectationBuilder, ExpectationState, ExpectationSummary, ResultShape};
pub use matcher::Matcher;
pub use report::{UnexpectedCall, VerificationReport};
pub use returns::{MemoryWriter, ProgrammedError};
pub use times::Times;

use expectation::{Expectation, ExpectationSet};
use returns::{Pending, Returns};

use crate::call_log::{CallLogRecorder, CallRecord};
use crate::config::{ConfigError, MockConfig, Strictness};
use crate::ports::{FileSystem, Operation, PortError, Writer};

/// Lifecycle of a mock. There is no way back from `Verifying`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Programming,
    Verifying,
}

/// Everything guarded by the mock's single lock.
struct MockState {
    phase: Phase,
    /// Bumped by every checkpoint so builders from before it are refused.
    epoch: u64,
    expectations: ExpectationSet,
    recorder: CallLogRecorder,
    unexpected: Vec<CallRecord>,
}

impl MockState {
    fn report(&self) -> VerificationReport {
        let unmet = self
            .expectations
            .summaries()
            .into_iter()
            .filter(|s| s.state != ExpectationState::Satisfied)
            .collect();
        VerificationReport { unmet, unexpected: self.unexpected.clone() }
    }
}

/// What a call resolved to while the lock was held.
enum Outcome<O> {
    Matched(Pending<O>),
    NoReturn(usize),
    Unexpected(Vec<ExpectationSummary>),
    AfterVerification,
}

/// Test double for [`FileSystem`] that replays programmed results.
pub struct MockFileSystem {
    state: Mutex<MockState>,
    strictness: Strictness,
    call_log_dir: Option<PathBuf>,
}

impl MockFileSystem {
    /// Strict mock without a call log directory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&MockConfig::default())
    }

    /// Mock configured by `config`.
    #[must_use]
    pub fn with_config(config: &MockConfig) -> Self {
        Self {
            state: Mutex::new(MockState {
                phase: Phase::Programming,
                epoch: 0,
                expectations: ExpectationSet::default(),
                recorder: CallLogRecorder::new(),
                unexpected: Vec::new(),
            }),
            strictness: config.strictness,
            call_log_dir: config.call_log_dir.clone(),
        }
    }

    /// Mock configured from `FSPORT_STRICTNESS` and `FSPORT_CALL_LOG`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::with_config(&MockConfig::from_env()?))
    }

    /// Panic on unexpected calls.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strictness = Strictness::Strict;
        self
    }

    /// Return [`UnexpectedCall`] errors and fail at teardown instead of
    /// panicking on unexpected calls.
    #[must_use]
    pub fn lenient(mut self) -> Self {
        self.strictness = Strictness::Lenient;
        self
    }

    /// Write the call log into `dir` at teardown.
    #[must_use]
    pub fn with_call_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.call_log_dir = Some(dir.into());
        self
    }

    /// Name the mock in its call log.
    #[must_use]
    pub fn named(self, name: impl Into<String>) -> Self {
        self.lock().recorder.set_name(name);
        self
    }

    /// Reaction to unexpected calls.
    #[must_use]
    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Session identifier used for the call log file.
    #[must_use]
    pub fn session(&self) -> String {
        self.lock().recorder.session().to_string()
    }

    /// Program an expectation for [`FileSystem::open_file`].
    ///
    /// # Panics
    ///
    /// Panics if the mock was already verified.
    pub fn expect_open_file(&self) -> ExpectationBuilder<'_, Writer> {
        self.expect::<Writer>()
    }

    /// Program an expectation for [`FileSystem::read_file`].
    ///
    /// # Panics
    ///
    /// Panics if the mock was already verified.
    pub fn expect_read_file(&self) -> ExpectationBuilder<'_, Vec<u8>> {
        self.expect::<Vec<u8>>()
    }

    /// Calls made so far, in order, including unexpected ones.
    #[must_use]
    pub fn calls(&self) -> Vec<CallRecord> {
        self.lock().recorder.calls().to_vec()
    }

    /// Number of calls made to `operation`, including unexpected ones.
    #[must_use]
    pub fn call_count(&self, operation: Operation) -> usize {
        self.lock().recorder.calls().iter().filter(|c| c.operation == operation).count()
    }

    /// Asserts that calls equal to `expected` were made in that order.
    ///
    /// Paths compare against [`CallRecord::path`]. Other calls, matched or
    /// not, may be interleaved.
    ///
    /// # Panics
    ///
    /// Panics naming the first call that is missing or out of order.
    pub fn assert_call_order(&self, expected: &[(Operation, &str)]) {
        let calls = self.calls();
        let mut found = 0;
        for call in &calls {
            if found < expected.len() && (call.operation, call.path.as_str()) == expected[found] {
                found += 1;
            }
        }
        if let Some((operation, path)) = expected.get(found) {
            let mut made = String::new();
            for call in &calls {
                let _ = write!(made, "\n  #{} {}({:?})", call.seq, call.operation, call.path);
            }
            panic!(
                "expected call #{found} {operation}({path:?}) was not made in order; calls:{made}"
            );
        }
    }

    /// Snapshot of every programmed expectation.
    #[must_use]
    pub fn expectations(&self) -> Vec<ExpectationSummary> {
        self.lock().expectations.summaries()
    }

    /// Verify all expectations now instead of at teardown.
    ///
    /// The mock accepts neither programming nor calls afterwards, and
    /// teardown does not verify again.
    ///
    /// # Errors
    ///
    /// Returns every unmet expectation and unexpected call.
    pub fn verify(&self) -> Result<(), VerificationReport> {
        let report = {
            let mut state = self.lock();
            state.phase = Phase::Verifying;
            state.report()
        };
        Self::conclude(report)
    }

    /// Verify all expectations, then discard them so the mock can be
    /// programmed afresh.
    ///
    /// # Errors
    ///
    /// Returns every unmet expectation and unexpected call since the last
    /// checkpoint.
    ///
    /// # Panics
    ///
    /// Panics if the mock was already verified.
    pub fn checkpoint(&self) -> Result<(), VerificationReport> {
        let report = {
            let mut state = self.lock();
            if state.phase == Phase::Verifying {
                drop(state);
                panic!("checkpoint on a mock that was already verified");
            }
            let report = state.report();
            state.expectations.clear();
            state.unexpected.clear();
            state.epoch += 1;
            report
        };
        Self::conclude(report)
    }

    fn conclude(report: VerificationReport) -> Result<(), VerificationReport> {
        if report.is_clean() {
            tracing::debug!("mock expectations satisfied");
            Ok(())
        } else {
            tracing::warn!(
                unmet = report.unmet.len(),
                unexpected = report.unexpected.len(),
                "mock expectations not satisfied"
            );
            Err(report)
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn expect<O: ResultShape>(&self) -> ExpectationBuilder<'_, O> {
        let (epoch, index) = {
            let mut state = self.lock();
            if state.phase == Phase::Verifying {
                drop(state);
                panic!("cannot program {} on a mock that was already verified", O::OPERATION);
            }
            let epoch = state.epoch;
            let expectations = O::slot(&mut state.expectations);
            expectations.push(Expectation::new());
            (epoch, expectations.len() - 1)
        };
        ExpectationBuilder::new(self, epoch, index)
    }

    pub(crate) fn update_expectation<O: ResultShape>(
        &self,
        epoch: u64,
        index: usize,
        f: impl FnOnce(&mut Expectation<O>),
    ) {
        let mut state = self.lock();
        if state.phase == Phase::Verifying {
            drop(state);
            panic!("cannot program {} on a mock that was already verified", O::OPERATION);
        }
        if state.epoch != epoch {
            drop(state);
            panic!(
                "cannot program {}#{index}: its expectations were discarded by checkpoint",
                O::OPERATION
            );
        }
        let Some(expectation) = O::slot(&mut state.expectations).get_mut(index) else {
            drop(state);
            panic!("cannot program {}#{index}: no such expectation", O::OPERATION);
        };
        f(expectation);
    }

    /// Matches, records and answers one call.
    fn invoke<O: ResultShape>(&self, path: &Path) -> Result<O, PortError> {
        let operation = O::OPERATION;
        let outcome = {
            let mut state = self.lock();
            let state = &mut *state;
            if state.phase == Phase::Verifying {
                state.recorder.record(operation, path, None);
                Outcome::AfterVerification
            } else {
                let expectations = O::slot(&mut state.expectations);
                let matched =
                    expectations.iter().position(|e| e.accepts(path) && !e.is_exhausted());
                if let Some(index) = matched {
                    let expectation = &mut expectations[index];
                    expectation.calls += 1;
                    let pending = expectation.returns.as_mut().map(Returns::pending);
                    state.recorder.record(operation, path, Some(index));
                    tracing::debug!(%operation, path = %path.display(), index, "matched call");
                    pending.map_or(Outcome::NoReturn(index), Outcome::Matched)
                } else {
                    if let Some(exhausted) = expectations.iter_mut().find(|e| e.accepts(path)) {
                        exhausted.violated = true;
                    }
                    let record = state.recorder.record(operation, path, None).clone();
                    state.unexpected.push(record);
                    let programmed = state
                        .expectations
                        .summaries()
                        .into_iter()
                        .filter(|s| s.operation == operation)
                        .collect();
                    Outcome::Unexpected(programmed)
                }
            }
        };

        match outcome {
            Outcome::Matched(pending) => pending.resolve(path).unwrap_or_else(|| {
                panic!("return_once value for {operation}({path:?}) was already consumed")
            }),
            Outcome::NoReturn(index) => {
                panic!("no return value specified for {operation}#{index}, called with {path:?}")
            }
            Outcome::Unexpected(programmed) => match self.strictness {
                Strictness::Strict => {
                    panic!("{}", unexpected_diagnostic(operation, path, &programmed))
                }
                Strictness::Lenient => {
                    tracing::warn!(%operation, path = %path.display(), "unexpected call");
                    Err(Box::new(UnexpectedCall {
                        operation,
                        path: path.display().to_string(),
                    }))
                }
            },
            Outcome::AfterVerification => {
                panic!("{operation}({path:?}) called on a mock that was already verified")
            }
        }
    }
}

fn unexpected_diagnostic(
    operation: Operation,
    path: &Path,
    programmed: &[ExpectationSummary],
) -> String {
    let mut message = format!("unexpected call to {operation}({path:?})");
    if programmed.is_empty() {
        let _ = write!(message, "\nno {operation} expectations were programmed");
    } else {
        let _ = write!(message, "\nprogrammed {operation} expectations:");
        for summary in programmed {
            let _ = write!(message, "\n  {summary}");
        }
    }
    message
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MockFileSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockFileSystem")
            .field("strictness", &self.strictness)
            .field("call_log_dir", &self.call_log_dir)
            .finish_non_exhaustive()
    }
}

impl FileSystem for MockFileSystem {
    fn open_file(&self, path: &Path) -> Result<Writer, PortError> {
        self.invoke::<Writer>(path)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>, PortError> {
        self.invoke::<Vec<u8>>(path)
    }
}

impl Drop for MockFileSystem {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);

        if let Some(dir) = &self.call_log_dir {
            match state.recorder.finish(dir) {
                Ok(path) => tracing::debug!(path = %path.display(), "call log written"),
                Err(e) => tracing::warn!(error = %e, "failed to write call log"),
            }
        }

        if state.phase == Phase::Verifying {
            return;
        }
        state.phase = Phase::Verifying;
        let report = state.report();
        if report.is_clean() {
            return;
        }
        if std::thread::panicking() {
            tracing::warn!(%report, "mock expectations not satisfied while unwinding");
            return;
        }
        panic!("{report}");
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};
    use std::sync::Arc;

    use super::*;

    fn downcast_io(err: &PortError) -> &io::Error {
        err.downcast_ref::<io::Error>().expect("programmed errors are io::Error")
    }

    #[test]
    fn literal_bytes_are_returned_for_matching_path() {
        let fs = MockFileSystem::new();
        fs.expect_read_file().with_path("a.txt").return_bytes("hello");

        assert_eq!(fs.read_file(Path::new("a.txt")).unwrap(), b"hello");
    }

    #[test]
    fn literal_error_is_returned_for_open_file() {
        let fs = MockFileSystem::new();
        fs.expect_open_file()
            .with_path("out.txt")
            .return_error(ProgrammedError::storage_full("disk full"));

        let err = fs.open_file(Path::new("out.txt")).err().expect("programmed error");
        assert_eq!(downcast_io(&err).kind(), io::ErrorKind::StorageFull);
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn literal_writer_shares_buffer_with_test() {
        let fs = MockFileSystem::new();
        let written = MemoryWriter::new();
        fs.expect_open_file().with_path("out.txt").return_writer(written.clone());

        {
            let mut writer = fs.open_file(Path::new("out.txt")).unwrap();
            writer.write_all(b"exported").unwrap();
        }
        assert_eq!(written.contents_string(), "exported");
    }

    #[test]
    fn computed_result_receives_argument() {
        let fs = MockFileSystem::new();
        fs.expect_read_file()
            .times(Times::Exactly(2))
            .returning(|path| Ok(format!("contents of {}", path.display()).into_bytes()));

        assert_eq!(fs.read_file(Path::new("x")).unwrap(), b"contents of x");
        assert_eq!(fs.read_file(Path::new("y")).unwrap(), b"contents of y");
    }

    #[test]
    fn return_once_hands_out_owned_writer() {
        let fs = MockFileSystem::new();
        let sink = MemoryWriter::new();
        let writer: Writer = Box::new(sink.clone());
        fs.expect_open_file().return_once(Ok(writer));

        fs.open_file(Path::new("once.txt")).unwrap().write_all(b"1").unwrap();
        assert_eq!(sink.contents(), b"1");
    }

    #[test]
    #[should_panic(expected = "was already consumed")]
    fn return_once_panics_when_spent() {
        let fs = MockFileSystem::new();
        fs.expect_read_file().times(Times::Exactly(2)).return_once(Ok(b"x".to_vec()));

        let _ = fs.read_file(Path::new("a"));
        let _ = fs.read_file(Path::new("a"));
    }

    #[test]
    #[should_panic(expected = "unexpected call to read_file(\"a.txt\")")]
    fn call_without_expectations_panics_naming_operation() {
        let fs = MockFileSystem::new();
        let _ = fs.read_file(Path::new("a.txt"));
    }

    #[test]
    #[should_panic(expected = "no return value specified for read_file#0")]
    fn expectation_without_result_panics() {
        let fs = MockFileSystem::new();
        fs.expect_read_file().with_path("a.txt");
        let _ = fs.read_file(Path::new("a.txt"));
    }

    #[test]
    #[should_panic(expected = "unexpected call to read_file")]
    fn second_call_to_one_shot_expectation_panics() {
        let fs = MockFileSystem::new();
        fs.expect_read_file().with_path("a.txt").once().return_bytes("hello");

        let _ = fs.read_file(Path::new("a.txt"));
        let _ = fs.read_file(Path::new("a.txt"));
    }

    #[test]
    fn first_registered_match_wins_until_exhausted() {
        let fs = MockFileSystem::new();
        fs.expect_read_file().with_path("a.txt").return_bytes("first");
        fs.expect_read_file().return_bytes("fallback");

        assert_eq!(fs.read_file(Path::new("a.txt")).unwrap(), b"first");
        assert_eq!(fs.read_file(Path::new("a.txt")).unwrap(), b"fallback");
        let calls = fs.calls();
        assert_eq!(calls[0].expectation, Some(0));
        assert_eq!(calls[1].expectation, Some(1));
    }

    #[test]
    fn distinct_matchers_are_order_independent() {
        let fs = MockFileSystem::new();
        fs.expect_read_file().with_path("b.txt").return_bytes("B");
        fs.expect_read_file().with_path("a.txt").return_bytes("A");

        assert_eq!(fs.read_file(Path::new("a.txt")).unwrap(), b"A");
        assert_eq!(fs.read_file(Path::new("b.txt")).unwrap(), b"B");
    }

    #[test]
    fn verify_reports_unmet_expectation() {
        let fs = MockFileSystem::new();
        fs.expect_read_file().with_path("a.txt").return_bytes("hello");

        let report = fs.verify().unwrap_err();
        assert_eq!(report.unmet.len(), 1);
        assert_eq!(report.unmet[0].calls, 0);
        assert_eq!(report.unmet[0].times, Times::Exactly(1));
        assert_eq!(report.unmet[0].state, ExpectationState::Pending);
    }

    #[test]
    fn verify_reports_all_unmet_expectations_together() {
        let fs = MockFileSystem::new();
        fs.expect_read_file().with_path("a.txt").times(Times::Exactly(2)).return_bytes("a");
        fs.expect_open_file().with_path("out.txt").return_writer(MemoryWriter::new());

        let _ = fs.read_file(Path::new("a.txt"));
        let report = fs.verify().unwrap_err();
        let states: Vec<_> = report.unmet.iter().map(|s| s.state).collect();
        assert_eq!(states, [ExpectationState::Pending, ExpectationState::PartiallySatisfied]);
    }

    #[test]
    fn verify_passes_when_counts_are_met() {
        let fs = MockFileSystem::new();
        fs.expect_read_file().times(Times::Exactly(3)).return_bytes("x");
        for _ in 0..3 {
            let _ = fs.read_file(Path::new("x"));
        }
        assert!(fs.verify().is_ok());
    }

    #[test]
    #[should_panic(expected = "1 unmet expectation(s)")]
    fn drop_panics_on_unmet_expectation() {
        let fs = MockFileSystem::new();
        fs.expect_read_file().with_path("a.txt").return_bytes("hello");
    }

    #[test]
    fn drop_is_silent_after_explicit_verify() {
        let fs = MockFileSystem::new();
        fs.expect_read_file().return_bytes("never read");
        assert!(fs.verify().is_err());
    }

    #[test]
    #[should_panic(expected = "already verified")]
    fn programming_after_verify_panics() {
        let fs = MockFileSystem::new();
        fs.verify().unwrap();
        fs.expect_read_file();
    }

    #[test]
    #[should_panic(expected = "called on a mock that was already verified")]
    fn call_after_verify_panics() {
        let fs = MockFileSystem::new();
        fs.verify().unwrap();
        let _ = fs.read_file(Path::new("late.txt"));
    }

    #[test]
    fn lenient_mock_returns_error_and_reports_at_verify() {
        let fs = MockFileSystem::new().lenient();
        let err = fs.read_file(Path::new("stray.txt")).unwrap_err();
        let unexpected = err.downcast_ref::<UnexpectedCall>().unwrap();
        assert_eq!(unexpected.operation, Operation::ReadFile);
        assert_eq!(unexpected.path, "stray.txt");

        let report = fs.verify().unwrap_err();
        assert!(report.unmet.is_empty());
        assert_eq!(report.unexpected.len(), 1);
    }

    #[test]
    fn over_called_exact_expectation_is_violated() {
        let fs = MockFileSystem::new().lenient();
        fs.expect_read_file().with_path("a.txt").return_bytes("x");

        let _ = fs.read_file(Path::new("a.txt"));
        assert!(fs.read_file(Path::new("a.txt")).is_err());

        assert_eq!(fs.expectations()[0].state, ExpectationState::Violated);
        let report = fs.verify().unwrap_err();
        assert_eq!(report.unmet[0].state, ExpectationState::Violated);
        assert_eq!(report.unexpected.len(), 1);
    }

    #[test]
    fn never_expectation_rejects_matching_calls() {
        let fs = MockFileSystem::new().lenient();
        fs.expect_open_file().with_path("forbidden.txt").never();

        assert!(fs.open_file(Path::new("forbidden.txt")).is_err());
        assert!(fs.verify().is_err());
    }

    #[test]
    fn checkpoint_resets_expectations() {
        let fs = MockFileSystem::new();
        fs.expect_read_file().return_bytes("a");
        let _ = fs.read_file(Path::new("a"));
        assert!(fs.checkpoint().is_ok());
        assert!(fs.expectations().is_empty());

        fs.expect_read_file().return_bytes("b");
        assert!(fs.checkpoint().is_err());
        assert_eq!(fs.calls().len(), 1);
    }

    #[test]
    fn call_log_records_unexpected_and_matched_calls_in_order() {
        let fs = MockFileSystem::new().lenient();
        fs.expect_open_file().return_writer(MemoryWriter::new());

        let _ = fs.read_file(Path::new("a.txt"));
        let _ = fs.open_file(Path::new("b.txt"));

        let calls = fs.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!((calls[0].seq, calls[0].operation), (0, Operation::ReadFile));
        assert!(calls[0].is_unexpected());
        assert_eq!((calls[1].seq, calls[1].operation), (1, Operation::OpenFile));
        assert_eq!(fs.call_count(Operation::OpenFile), 1);
        let _ = fs.checkpoint();
    }

    #[test]
    fn call_log_is_written_at_teardown() {
        let dir = tempfile::tempdir().unwrap();
        let session = {
            let fs = MockFileSystem::new().named("teardown").with_call_log_dir(dir.path());
            fs.expect_read_file().return_bytes("x");
            let _ = fs.read_file(Path::new("a.txt"));
            fs.session()
        };

        let log = crate::call_log::CallLog::load(&dir.path().join(format!("{session}.calls.yaml")))
            .unwrap();
        assert_eq!(log.name.as_deref(), Some("teardown"));
        assert_eq!(log.calls.len(), 1);
        assert_eq!(log.calls[0].path, "a.txt");
    }

    #[test]
    fn concurrent_calls_never_double_grant_one_shot_expectation() {
        let fs = Arc::new(MockFileSystem::new().lenient());
        fs.expect_read_file().once().return_bytes("only once");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let fs = Arc::clone(&fs);
                std::thread::spawn(move || fs.read_file(Path::new("shared.txt")).is_ok())
            })
            .collect();
        let granted = handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count();

        assert_eq!(granted, 1);
        assert_eq!(fs.call_count(Operation::ReadFile), 8);
        let report = fs.verify().unwrap_err();
        assert_eq!(report.unexpected.len(), 7);
    }

    #[test]
    #[should_panic(expected = "discarded by checkpoint")]
    fn builder_from_before_checkpoint_is_refused() {
        let fs = MockFileSystem::new();
        let stale = fs.expect_read_file().with_path("old.txt").times(Times::AtMost(1));
        fs.checkpoint().unwrap();
        fs.expect_read_file().with_path("new.txt").return_bytes("new");

        stale.return_bytes("old");
    }

    #[test]
    fn stale_builder_leaves_new_expectation_untouched() {
        let fs = MockFileSystem::new();
        let stale = fs.expect_read_file().with_path("old.txt").times(Times::AtMost(1));
        fs.checkpoint().unwrap();
        fs.expect_read_file().with_path("new.txt").return_bytes("new");

        let refused = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            stale.return_bytes("old");
        }));
        assert!(refused.is_err());
        assert_eq!(fs.read_file(Path::new("new.txt")).unwrap(), b"new");
    }

    #[test]
    #[should_panic(expected = "between 3 and 1 can never be met")]
    fn inverted_between_is_rejected_when_programmed() {
        let fs = MockFileSystem::new();
        fs.expect_read_file().times(Times::Between(3, 1));
    }

    #[test]
    fn computed_result_may_inspect_the_mock() {
        let fs = Arc::new(MockFileSystem::new());
        let weak = Arc::downgrade(&fs);
        fs.expect_read_file().returning(move |_| -> Result<Vec<u8>, PortError> {
            let calls = weak.upgrade().map_or(0, |fs| fs.calls().len());
            Ok(calls.to_string().into_bytes())
        });

        assert_eq!(fs.read_file(Path::new("a.txt")).unwrap(), b"1");
    }

    #[test]
    fn call_order_allows_interleaved_calls() {
        let fs = MockFileSystem::new();
        fs.expect_read_file().times(Times::Any).return_bytes("src");
        fs.expect_open_file().times(Times::Any).return_writer(MemoryWriter::new());

        let _ = fs.read_file(Path::new("BUILD.bazel"));
        let _ = fs.read_file(Path::new("defs.bzl"));
        let _ = fs.open_file(Path::new("CMakeLists.txt"));

        fs.assert_call_order(&[
            (Operation::ReadFile, "BUILD.bazel"),
            (Operation::OpenFile, "CMakeLists.txt"),
        ]);
    }

    #[test]
    #[should_panic(expected = "expected call #1 read_file(\"a.txt\") was not made in order")]
    fn call_order_rejects_reversed_calls() {
        let fs = MockFileSystem::new();
        fs.expect_read_file().times(Times::Any).return_bytes("x");
        fs.expect_open_file().times(Times::Any).return_writer(MemoryWriter::new());

        let _ = fs.read_file(Path::new("a.txt"));
        let _ = fs.open_file(Path::new("out.txt"));

        fs.assert_call_order(&[(Operation::OpenFile, "out.txt"), (Operation::ReadFile, "a.txt")]);
    }

    #[test]
    fn predicate_matcher_selects_calls() {
        let fs = MockFileSystem::new();
        fs.expect_read_file()
            .matching("ends with .bzl", |p: &Path| p.extension().is_some_and(|e| e == "bzl"))
            .times(Times::AtLeast(1))
            .return_bytes("load()");

        assert_eq!(fs.read_file(Path::new("defs.bzl")).unwrap(), b"load()");
        assert_eq!(fs.read_file(Path::new("more.bzl")).unwrap(), b"load()");
    }
}
