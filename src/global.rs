//! Process-wide default logger
//!
//! Meant for the composition root: install once with [`replace_globals`],
//! pass handles explicitly everywhere else. Until something is installed,
//! [`global`] returns a logger that discards everything.
//!
//! ```
//! use rust_logger_facade::prelude::*;
//!
//! let logger = Logger::console("svc", Mode::Production, Severity::Info);
//! let previous = replace_globals(logger);
//! global().info("via the ambient logger");
//! replace_globals(previous);
//! ```

use crate::core::{LogLevel, Logger, LoggerError, Result};
use parking_lot::RwLock;
use std::sync::LazyLock;

static GLOBAL_LOGGER: LazyLock<RwLock<Logger>> = LazyLock::new(|| RwLock::new(Logger::noop()));

/// Clone of the current process-wide logger
pub fn global() -> Logger {
    GLOBAL_LOGGER.read().clone()
}

/// Install `logger` as the process-wide default and return the one it
/// replaces
pub fn replace_globals(logger: Logger) -> Logger {
    std::mem::replace(&mut *GLOBAL_LOGGER.write(), logger)
}

/// Forwards `log` crate records to whatever [`global`] returns at the time
struct GlobalLogBridge;

impl log::Log for GlobalLogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        GLOBAL_LOGGER
            .read()
            .enabled(LogLevel::from(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        global().log_record(record);
    }

    fn flush(&self) {
        if let Err(e) = global().sync() {
            eprintln!("[LOGGER ERROR] Failed to flush: {}", e);
        }
    }
}

/// Route the `log` crate macros (`log::info!` and friends) to the
/// process-wide logger
///
/// Replacing the global logger later also redirects these records. The
/// `log` crate accepts only one backend per process.
///
/// # Errors
///
/// Returns an error if a `log` backend is already installed
pub fn install_log_bridge() -> Result<()> {
    log::set_boxed_logger(Box::new(GlobalLogBridge))
        .map_err(|e| LoggerError::other(format!("Failed to install log bridge: {}", e)))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}
