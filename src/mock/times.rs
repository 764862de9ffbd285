//! Call-count constraints.

use std::fmt;

/// How many times an expectation must be invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Times {
    /// Exactly `n` calls.
    Exactly(usize),
    /// `n` or more calls.
    AtLeast(usize),
    /// At most `n` calls, zero included.
    AtMost(usize),
    /// Between `min` and `max` calls, both inclusive.
    Between(usize, usize),
    /// Any number of calls, zero included.
    Any,
}

impl Default for Times {
    fn default() -> Self {
        Self::Exactly(1)
    }
}

impl Times {
    /// Fewest calls that satisfy the constraint.
    #[must_use]
    pub fn min(self) -> usize {
        match self {
            Self::Exactly(n) | Self::AtLeast(n) | Self::Between(n, _) => n,
            Self::AtMost(_) | Self::Any => 0,
        }
    }

    /// Most calls the constraint allows, if bounded.
    #[must_use]
    pub fn max(self) -> Option<usize> {
        match self {
            Self::Exactly(n) | Self::AtMost(n) | Self::Between(_, n) => Some(n),
            Self::AtLeast(_) | Self::Any => None,
        }
    }

    /// Returns `true` once no further call may be granted.
    #[must_use]
    pub fn is_exhausted(self, calls: usize) -> bool {
        self.max().is_some_and(|max| calls >= max)
    }

    /// Returns `true` if `calls` satisfies the constraint.
    #[must_use]
    pub fn is_satisfied(self, calls: usize) -> bool {
        calls >= self.min() && self.max().is_none_or(|max| calls <= max)
    }
}

impl fmt::Display for Times {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "exactly {n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
            Self::AtMost(n) => write!(f, "at most {n}"),
            Self::Between(min, max) => write!(f, "between {min} and {max}"),
            Self::Any => f.write_str("any number of times"),
        }
    }
}
