//! Appender trait for log output destinations

use super::error::Result;

/// A destination for encoded lines
///
/// Each core owns its appender behind a mutex, so implementations only need
/// to be `Send`.
pub trait Appender: Send {
    /// Write one encoded entry; `line` carries no trailing newline.
    fn append(&mut self, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
