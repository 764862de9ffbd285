//! Port traits defining external boundaries.
//!
//! Implementations live outside the application core; the test double
//! lives in `src/mock/`.

pub mod filesystem;

pub use filesystem::{FileSystem, Operation, PortError, Writer};
