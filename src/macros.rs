//! Logging macros for the format-string call shape.
//!
//! Each macro forwards `format_args!` to the matching `*_fmt` method, so the
//! message is only rendered when some core accepts the level.
//!
//! # Examples
//!
//! ```
//! use rust_logger_facade::prelude::*;
//! use rust_logger_facade::info;
//!
//! let logger = Logger::noop();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a formatted message at an explicit level.
///
/// Never exits or panics, whatever the level; use [`fatal!`] or [`dpanic!`]
/// for those behaviors.
///
/// # Examples
///
/// ```
/// # use rust_logger_facade::prelude::*;
/// # let logger = Logger::noop();
/// use rust_logger_facade::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger: &$crate::Logger = &$logger;
        let level = $level;
        if logger.enabled(level) {
            logger.log(level, ::std::format!($($arg)+), $crate::Fields::new());
        }
    }};
}

/// Log a debug-level message.
///
/// ```
/// # use rust_logger_facade::prelude::*;
/// # let logger = Logger::noop();
/// use rust_logger_facade::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug_fmt(::std::format_args!($($arg)+))
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info_fmt(::std::format_args!($($arg)+))
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn_fmt(::std::format_args!($($arg)+))
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error_fmt(::std::format_args!($($arg)+))
    };
}

/// Log at `DPanic`; panics afterwards when the logger has `panic_on_assert`.
#[macro_export]
macro_rules! dpanic {
    ($logger:expr, $($arg:tt)+) => {
        $logger.panic_fmt(::std::format_args!($($arg)+))
    };
}

/// Log at `Fatal`, flush, and exit the process.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal_fmt(::std::format_args!($($arg)+))
    };
}
