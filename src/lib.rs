//! # Rust Logger Facade
//!
//! A thin, leveled, structured logging facade. One call builds a logger that
//! writes human-readable lines to the console, splitting errors onto stderr,
//! and JSON lines to size-rotated files.
//!
//! ## Features
//!
//! - **Two modes**: development (colored, verbose keys) and production (terse keys)
//! - **Console split**: below `Error` to stdout, `Error` and above to stderr
//! - **File fan-out**: one JSON stream written to any number of rotated files
//! - **Five call shapes**: plain, concatenated, formatted, space-joined, structured
//! - **Thread Safe**: handles are cheap to clone and share across threads
//!
//! ## Example
//!
//! ```
//! use rust_logger_facade::prelude::*;
//!
//! let logger = Logger::console("svc", Mode::Development, Severity::Debug);
//! logger.info("service started");
//! logger.warn_with("slow request", Fields::new().with("elapsed_ms", 812));
//! logger.error_fmt(format_args!("upstream returned {}", 502));
//! ```

pub mod appenders;
pub mod config;
pub mod core;
pub mod global;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
    pub use crate::config::LoggerConfig;
    pub use crate::core::{
        Appender, FieldValue, Fields, LogEntry, LogLevel, Logger, LoggerError, LoggerMetrics,
        LoggerOptions, Mode, Result, Severity,
    };
    pub use crate::global::{global, replace_globals};
}

pub use appenders::{ConsoleAppender, MultiAppender, RotatingFileAppender, RotationPolicy};
pub use config::LoggerConfig;
pub use core::{
    Appender, Caller, Core, Encoder, EncoderConfig, FieldValue, Fields, LevelRange, LogEntry,
    LogLevel, Logger, LoggerError, LoggerMetrics, LoggerOptions, Mode, Result, Severity, Tee,
    TimestampFormat, FATAL_EXIT_CODE,
};
pub use global::{global, install_log_bridge, replace_globals};
