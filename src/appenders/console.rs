//! Console appender implementation

use crate::core::{Appender, Result};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

enum Target {
    Stdout,
    Stderr,
    Writer(Box<dyn Write + Send>),
}

/// Writes lines to standard output, standard error, or a caller-supplied
/// writer
pub struct ConsoleAppender {
    target: Target,
    name: String,
}

impl ConsoleAppender {
    pub fn stdout() -> Self {
        Self {
            target: Target::Stdout,
            name: "stdout".to_string(),
        }
    }

    pub fn stderr() -> Self {
        Self {
            target: Target::Stderr,
            name: "stderr".to_string(),
        }
    }

    /// Redirect console output, e.g. into a [`SharedBuffer`] for inspection
    pub fn with_writer(name: impl Into<String>, writer: impl Write + Send + 'static) -> Self {
        Self {
            target: Target::Writer(Box::new(writer)),
            name: name.into(),
        }
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, line: &str) -> Result<()> {
        match self.target {
            Target::Stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(line.as_bytes())?;
                out.write_all(b"\n")?;
            }
            Target::Stderr => {
                let mut err = std::io::stderr().lock();
                err.write_all(line.as_bytes())?;
                err.write_all(b"\n")?;
            }
            Target::Writer(ref mut writer) => {
                writer.write_all(line.as_bytes())?;
                writer.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.target {
            Target::Stdout => std::io::stdout().flush()?,
            Target::Stderr => std::io::stderr().flush()?,
            Target::Writer(ref mut writer) => writer.flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Cloneable in-memory writer; every clone sees the same bytes
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_target_appends_newline() {
        let buffer = SharedBuffer::new();
        let mut appender = ConsoleAppender::with_writer("capture", buffer.clone());

        appender.append("first").unwrap();
        appender.append("second").unwrap();
        appender.flush().unwrap();

        assert_eq!(buffer.contents(), "first\nsecond\n");
        assert_eq!(appender.name(), "capture");
    }

    #[test]
    fn test_std_stream_names() {
        assert_eq!(ConsoleAppender::stdout().name(), "stdout");
        assert_eq!(ConsoleAppender::stderr().name(), "stderr");
    }

    #[test]
    fn test_shared_buffer_clear() {
        let mut buffer = SharedBuffer::new();
        buffer.write_all(b"a\nb\n").unwrap();
        assert_eq!(buffer.lines(), vec!["a", "b"]);
        buffer.clear();
        assert!(buffer.contents().is_empty());
    }
}
