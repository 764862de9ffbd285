//! Verification results and the error handed out for unexpected calls.

use std::fmt;

use super::expectation::ExpectationSummary;
use crate::call_log::CallRecord;
use crate::ports::Operation;

/// Everything verification found wrong, reported together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    /// Expectations whose call count was not satisfied.
    pub unmet: Vec<ExpectationSummary>,
    /// Calls that matched no expectation.
    pub unexpected: Vec<CallRecord>,
}

impl VerificationReport {
    /// Returns `true` if nothing went wrong.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unmet.is_empty() && self.unexpected.is_empty()
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mock expectations not satisfied: {} unmet expectation(s), {} unexpected call(s)",
            self.unmet.len(),
            self.unexpected.len()
        )?;
        for summary in &self.unmet {
            write!(f, "\n  unmet {summary}")?;
        }
        for call in &self.unexpected {
            write!(f, "\n  unexpected #{} {}({:?})", call.seq, call.operation, call.path)?;
        }
        Ok(())
    }
}

impl std::error::Error for VerificationReport {}

/// Error returned by a lenient mock for a call nobody expected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unexpected call to {operation}({path:?})")]
pub struct UnexpectedCall {
    /// Port method invoked.
    pub operation: Operation,
    /// Path argument of the call.
    pub path: String,
}
