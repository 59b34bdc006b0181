//! Cores and the composite sink
//!
//! A [`Core`] pairs an encoder, a writer and a level predicate. A [`Tee`]
//! offers every entry to each of its cores; each one decides on its own
//! whether to encode and write it.

use super::appender::Appender;
use super::encoder::Encoder;
use super::error::Result;
use super::log_entry::LogEntry;
use super::log_level::{LevelRange, LogLevel};
use super::metrics::LoggerMetrics;
use parking_lot::Mutex;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// One filtered (encoder, writer) pairing
pub struct Core {
    encoder: Encoder,
    writer: Mutex<Box<dyn Appender>>,
    levels: LevelRange,
}

impl Core {
    pub fn new(encoder: Encoder, writer: impl Appender + 'static, levels: LevelRange) -> Self {
        Self::from_boxed(encoder, Box::new(writer), levels)
    }

    pub fn from_boxed(encoder: Encoder, writer: Box<dyn Appender>, levels: LevelRange) -> Self {
        Self {
            encoder,
            writer: Mutex::new(writer),
            levels,
        }
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.levels.enabled(level)
    }

    pub fn levels(&self) -> LevelRange {
        self.levels
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// Encode and write `entry`; callers check [`Core::enabled`] first
    pub fn write(&self, entry: &LogEntry) -> Result<()> {
        let line = self.encoder.encode(entry)?;
        // Encoding happens outside the lock; only the write is serialised
        let mut writer = self.writer.lock();
        writer.append(&line)
    }

    pub fn sync(&self) -> Result<()> {
        self.writer.lock().flush()
    }

    pub fn writer_name(&self) -> String {
        self.writer.lock().name().to_string()
    }
}

/// Composite sink fanning entries out to every core
#[derive(Default)]
pub struct Tee {
    cores: Vec<Core>,
    metrics: LoggerMetrics,
}

impl Tee {
    pub fn new(cores: Vec<Core>) -> Self {
        Self {
            cores,
            metrics: LoggerMetrics::new(),
        }
    }

    /// A sink with no cores: every entry is discarded
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn cores(&self) -> &[Core] {
        &self.cores
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Whether at least one core would accept `level`
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.cores.iter().any(|core| core.enabled(level))
    }

    /// Offer `entry` to every core
    ///
    /// Failures, including panics inside an appender, are isolated per core:
    /// they are reported on stderr and counted, and never reach the caller.
    pub fn write(&self, entry: &LogEntry) {
        for (idx, core) in self.cores.iter().enumerate() {
            if !core.enabled(entry.level) {
                continue;
            }

            match catch_unwind(AssertUnwindSafe(|| core.write(entry))) {
                Ok(Ok(())) => {
                    self.metrics.record_written();
                }
                Ok(Err(e)) => {
                    self.metrics.record_failed_write();
                    eprintln!("[LOGGER ERROR] Core #{} failed to write: {}", idx, e);
                }
                Err(panic_info) => {
                    self.metrics.record_failed_write();
                    eprintln!(
                        "[LOGGER CRITICAL] Core #{} panicked: {}. \
                         Other cores continue to function.",
                        idx,
                        panic_message(panic_info.as_ref())
                    );
                }
            }
        }
    }

    /// Flush every core, returning the first error
    pub fn sync(&self) -> Result<()> {
        let mut first_error = None;
        for (idx, core) in self.cores.iter().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| core.sync())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    self.metrics.record_failed_flush();
                    first_error.get_or_insert(e);
                }
                Err(panic_info) => {
                    self.metrics.record_failed_flush();
                    eprintln!(
                        "[LOGGER CRITICAL] Core #{} panicked during flush: {}",
                        idx,
                        panic_message(panic_info.as_ref())
                    );
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Drop for Tee {
    fn drop(&mut self) {
        if let Err(e) = self.sync() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
