//! Call log recorded by the mock and its on-disk YAML form.

pub mod format;
pub mod recorder;

pub use format::{CallLog, CallLogError, CallRecord};
pub use recorder::CallLogRecorder;
