//! Logger facade
//!
//! [`Logger`] is a cheap, cloneable handle around a shared [`Tee`]. Every
//! call funnels into [`Logger::log`]: a level, a message and ordered fields.
//! The per-level helpers only differ in how they build the message:
//!
//! - `info(msg)`: message as given
//! - `info_args(&[..])`: operands concatenated
//! - `info_fmt(format_args!(..))`: template substitution (see the `info!` macro)
//! - `info_ln(&[..])`: operands joined with single spaces
//! - `info_with(msg, fields)`: structured fields attached

use super::error::Result;
use super::fields::Fields;
use super::log_entry::{Caller, LogEntry};
use super::log_level::LogLevel;
use super::metrics::LoggerMetrics;
use super::tee::Tee;
use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Exit code used by the fatal helpers
pub const FATAL_EXIT_CODE: i32 = 1;

/// Behavior switches carried by every handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerOptions {
    /// Whether `panic`/`panic_fmt`/… (the `DPanic` level) panic after writing
    pub panic_on_assert: bool,
    /// Record the call site of each entry
    pub add_caller: bool,
    /// Attach a captured backtrace to entries at or above this level
    pub stacktrace_level: Option<LogLevel>,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            panic_on_assert: false,
            add_caller: true,
            stacktrace_level: None,
        }
    }
}

#[derive(Clone)]
pub struct Logger {
    tee: Arc<Tee>,
    name: Option<String>,
    fields: Fields,
    options: LoggerOptions,
}

macro_rules! level_methods {
    ($level:expr, $plain:ident, $args:ident, $fmt:ident, $ln:ident, $with:ident) => {
        #[doc = concat!("Log `message` at `", stringify!($level), "`.")]
        #[track_caller]
        pub fn $plain(&self, message: impl Into<String>) {
            if self.enabled($level) {
                self.emit($level, message.into(), Fields::new(), Location::caller());
            }
        }

        #[doc = concat!("Log the concatenated operands at `", stringify!($level), "`.")]
        #[track_caller]
        pub fn $args(&self, args: &[&dyn fmt::Display]) {
            if self.enabled($level) {
                self.emit($level, concat_args(args), Fields::new(), Location::caller());
            }
        }

        #[doc = concat!("Log a formatted message at `", stringify!($level), "`.")]
        #[track_caller]
        pub fn $fmt(&self, args: fmt::Arguments<'_>) {
            if self.enabled($level) {
                self.emit($level, args.to_string(), Fields::new(), Location::caller());
            }
        }

        #[doc = concat!("Log the space-joined operands at `", stringify!($level), "`.")]
        #[track_caller]
        pub fn $ln(&self, args: &[&dyn fmt::Display]) {
            if self.enabled($level) {
                self.emit($level, join_args(args), Fields::new(), Location::caller());
            }
        }

        #[doc = concat!("Log `message` with structured fields at `", stringify!($level), "`.")]
        #[track_caller]
        pub fn $with(&self, message: impl Into<String>, fields: Fields) {
            if self.enabled($level) {
                self.emit($level, message.into(), fields, Location::caller());
            }
        }
    };
}

impl Logger {
    /// Wrap an already-composed sink
    pub fn from_tee(tee: Tee, options: LoggerOptions) -> Self {
        Self {
            tee: Arc::new(tee),
            name: None,
            fields: Fields::new(),
            options,
        }
    }

    /// A logger with no cores; every entry is discarded
    pub fn noop() -> Self {
        Self::from_tee(Tee::empty(), LoggerOptions::default())
    }

    /// Child logger whose name is this logger's name with `name` appended,
    /// dot-separated
    #[must_use]
    pub fn named(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }
        let mut child = self.clone();
        child.name = Some(match self.name {
            Some(ref parent) => format!("{}.{}", parent, name),
            None => name.to_string(),
        });
        child
    }

    /// Child logger that attaches `fields` to every entry, ahead of the
    /// per-call fields
    #[must_use]
    pub fn with(&self, fields: Fields) -> Self {
        let mut child = self.clone();
        child.fields.extend(&fields);
        child
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn options(&self) -> LoggerOptions {
        self.options
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        self.tee.metrics()
    }

    pub fn tee(&self) -> &Tee {
        &self.tee
    }

    /// Whether any core would accept an entry at `level`
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.tee.enabled(level)
    }

    /// Flush every core
    pub fn sync(&self) -> Result<()> {
        self.tee.sync()
    }

    /// Structured entry point every helper funnels into
    ///
    /// Only writes; the exit/panic behavior of `Fatal`, `Panic` and `DPanic`
    /// belongs to the dedicated helpers.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>, fields: Fields) {
        if self.enabled(level) {
            self.emit(level, message.into(), fields, Location::caller());
        }
    }

    level_methods!(LogLevel::Debug, debug, debug_args, debug_fmt, debug_ln, debug_with);
    level_methods!(LogLevel::Info, info, info_args, info_fmt, info_ln, info_with);
    level_methods!(LogLevel::Warn, warn, warn_args, warn_fmt, warn_ln, warn_with);
    level_methods!(LogLevel::Error, error, error_args, error_fmt, error_ln, error_with);

    /// Log at `Fatal`, flush, and exit the process
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) -> ! {
        self.fatal_exit(message.into(), Fields::new(), Location::caller())
    }

    #[track_caller]
    pub fn fatal_args(&self, args: &[&dyn fmt::Display]) -> ! {
        self.fatal_exit(concat_args(args), Fields::new(), Location::caller())
    }

    #[track_caller]
    pub fn fatal_fmt(&self, args: fmt::Arguments<'_>) -> ! {
        self.fatal_exit(args.to_string(), Fields::new(), Location::caller())
    }

    #[track_caller]
    pub fn fatal_ln(&self, args: &[&dyn fmt::Display]) -> ! {
        self.fatal_exit(join_args(args), Fields::new(), Location::caller())
    }

    #[track_caller]
    pub fn fatal_with(&self, message: impl Into<String>, fields: Fields) -> ! {
        self.fatal_exit(message.into(), fields, Location::caller())
    }

    /// Log at `DPanic`; panics afterwards only with `panic_on_assert`
    #[track_caller]
    pub fn panic(&self, message: impl Into<String>) {
        self.assert_failed(message.into(), Fields::new(), Location::caller());
    }

    #[track_caller]
    pub fn panic_args(&self, args: &[&dyn fmt::Display]) {
        self.assert_failed(concat_args(args), Fields::new(), Location::caller());
    }

    #[track_caller]
    pub fn panic_fmt(&self, args: fmt::Arguments<'_>) {
        self.assert_failed(args.to_string(), Fields::new(), Location::caller());
    }

    #[track_caller]
    pub fn panic_with(&self, message: impl Into<String>, fields: Fields) {
        self.assert_failed(message.into(), fields, Location::caller());
    }

    /// Log the space-joined operands at `Panic`, flush, and always panic
    #[track_caller]
    pub fn panic_ln(&self, args: &[&dyn fmt::Display]) -> ! {
        let message = join_args(args);
        if self.enabled(LogLevel::Panic) {
            self.emit(LogLevel::Panic, message.clone(), Fields::new(), Location::caller());
        }
        self.sync_before("panic");
        panic!("{}", message)
    }

    /// Route a `log` crate record through this logger
    pub fn log_record(&self, record: &log::Record<'_>) {
        let level = LogLevel::from(record.level());
        if !self.enabled(level) {
            return;
        }

        let mut entry = LogEntry::new(level, record.args().to_string());
        if self.options.add_caller {
            if let (Some(file), Some(line)) = (record.file(), record.line()) {
                entry.caller = Some(Caller {
                    file: file.to_string(),
                    line,
                });
            }
        }
        if !record.target().is_empty() {
            entry.fields.push("target", record.target());
        }
        self.dispatch(entry);
    }

    /// Most verbose `log` crate filter this logger still emits
    pub fn max_log_filter(&self) -> log::LevelFilter {
        if self.enabled(LogLevel::Debug) {
            log::LevelFilter::Trace
        } else if self.enabled(LogLevel::Info) {
            log::LevelFilter::Info
        } else if self.enabled(LogLevel::Warn) {
            log::LevelFilter::Warn
        } else if self.enabled(LogLevel::Error) {
            log::LevelFilter::Error
        } else {
            log::LevelFilter::Off
        }
    }

    fn fatal_exit(&self, message: String, fields: Fields, location: &Location<'_>) -> ! {
        if self.enabled(LogLevel::Fatal) {
            self.emit(LogLevel::Fatal, message, fields, location);
        }
        self.sync_before("exit");
        std::process::exit(FATAL_EXIT_CODE)
    }

    fn assert_failed(&self, message: String, fields: Fields, location: &Location<'_>) {
        if !self.options.panic_on_assert {
            if self.enabled(LogLevel::DPanic) {
                self.emit(LogLevel::DPanic, message, fields, location);
            }
            return;
        }
        if self.enabled(LogLevel::DPanic) {
            self.emit(LogLevel::DPanic, message.clone(), fields, location);
        }
        self.sync_before("panic");
        panic!("{}", message)
    }

    fn sync_before(&self, action: &str) {
        if let Err(e) = self.tee.sync() {
            eprintln!("[LOGGER ERROR] Failed to flush before {}: {}", action, e);
        }
    }

    fn emit(&self, level: LogLevel, message: String, fields: Fields, location: &Location<'_>) {
        let mut entry = LogEntry::new(level, message).with_fields(fields);
        if self.options.add_caller {
            entry = entry.with_caller(location);
        }
        self.dispatch(entry);
    }

    fn dispatch(&self, mut entry: LogEntry) {
        if !self.fields.is_empty() {
            let mut fields = self.fields.clone();
            fields.extend(&entry.fields);
            entry.fields = fields;
        }
        entry.logger_name = self.name.clone();
        if self
            .options
            .stacktrace_level
            .is_some_and(|min| entry.level >= min)
        {
            entry.stacktrace = Some(Backtrace::force_capture().to_string());
        }
        self.tee.write(&entry);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("cores", &self.tee.cores().len())
            .field("fields", &self.fields)
            .field("options", &self.options)
            .finish()
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        Logger::enabled(self, LogLevel::from(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        self.log_record(record);
    }

    fn flush(&self) {
        if let Err(e) = self.sync() {
            eprintln!("[LOGGER ERROR] Failed to flush: {}", e);
        }
    }
}

fn concat_args(args: &[&dyn fmt::Display]) -> String {
    use std::fmt::Write;
    let mut out = String::new();
    for arg in args {
        let _ = write!(out, "{}", arg);
    }
    out
}

fn join_args(args: &[&dyn fmt::Display]) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::console::{ConsoleAppender, SharedBuffer};
    use crate::core::encoder::{Encoder, EncoderConfig};
    use crate::core::log_level::LevelRange;
    use crate::core::tee::Core;
    use crate::core::{Appender, LoggerError};

    fn json_logger(floor: LogLevel, options: LoggerOptions) -> (Logger, SharedBuffer) {
        let buffer = SharedBuffer::new();
        let core = Core::new(
            Encoder::json(EncoderConfig::production()),
            ConsoleAppender::with_writer("buffer", buffer.clone()),
            LevelRange::at_least(floor),
        );
        (Logger::from_tee(Tee::new(vec![core]), options), buffer)
    }

    fn parsed(buffer: &SharedBuffer) -> Vec<serde_json::Value> {
        buffer
            .lines()
            .iter()
            .map(|line| serde_json::from_str(line).expect("valid json line"))
            .collect()
    }

    #[test]
    fn test_call_shapes() {
        let (logger, buffer) = json_logger(LogLevel::Debug, LoggerOptions::default());
        let count = 3;

        logger.info("plain");
        logger.info_args(&[&"a", &1, &"b"]);
        logger.info_fmt(format_args!("{} items", count));
        logger.info_ln(&[&"a", &1, &"b"]);

        let msgs: Vec<String> = parsed(&buffer)
            .iter()
            .map(|v| v["msg"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(msgs, vec!["plain", "a1b", "3 items", "a 1 b"]);
    }

    #[test]
    fn test_args_shape_never_inserts_separators() {
        let (logger, buffer) = json_logger(LogLevel::Debug, LoggerOptions::default());
        logger.warn_args(&[&1, &2]);
        logger.warn_args(&[&"id=", &7, &" ok"]);

        let lines = parsed(&buffer);
        assert_eq!(lines[0]["msg"], "12");
        assert_eq!(lines[1]["msg"], "id=7 ok");
    }

    #[test]
    fn test_below_floor_is_dropped() {
        let (logger, buffer) = json_logger(LogLevel::Info, LoggerOptions::default());
        logger.debug("hidden");
        logger.debug_fmt(format_args!("hidden {}", 1));
        logger.warn("shown");
        assert_eq!(buffer.lines().len(), 1);
    }

    #[test]
    fn test_caller_points_at_call_site() {
        let (logger, buffer) = json_logger(LogLevel::Debug, LoggerOptions::default());
        logger.error("where");
        let caller = parsed(&buffer)[0]["caller"].as_str().unwrap().to_string();
        assert!(caller.starts_with("core/logger.rs:"), "caller was {}", caller);
    }

    #[test]
    fn test_caller_can_be_disabled() {
        let options = LoggerOptions {
            add_caller: false,
            ..LoggerOptions::default()
        };
        let (logger, buffer) = json_logger(LogLevel::Debug, options);
        logger.info("no caller");
        assert!(parsed(&buffer)[0].get("caller").is_none());
    }

    #[test]
    fn test_named_and_with() {
        let (logger, buffer) = json_logger(LogLevel::Debug, LoggerOptions::default());
        let child = logger
            .named("svc")
            .named("http")
            .with(Fields::new().with("request_id", "abc"));

        child.info_with("handled", Fields::new().with("status", 200));

        let line = &parsed(&buffer)[0];
        assert_eq!(line["logger"], "svc.http");
        assert_eq!(line["request_id"], "abc");
        assert_eq!(line["status"], 200);
        assert_eq!(child.name(), Some("svc.http"));
        assert_eq!(logger.name(), None);
        assert_eq!(logger.named("").name(), None);
    }

    #[test]
    fn test_stacktrace_level() {
        let options = LoggerOptions {
            stacktrace_level: Some(LogLevel::Error),
            ..LoggerOptions::default()
        };
        let (logger, buffer) = json_logger(LogLevel::Debug, options);
        logger.warn("no trace");
        logger.error("trace");

        let lines = parsed(&buffer);
        assert!(lines[0].get("stacktrace").is_none());
        assert!(lines[1]["stacktrace"].is_string());
    }

    #[test]
    fn test_dpanic_without_assert_only_logs() {
        let (logger, buffer) = json_logger(LogLevel::Debug, LoggerOptions::default());
        logger.panic("invariant broken");
        logger.panic_fmt(format_args!("broken {}", 2));

        let lines = parsed(&buffer);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["lv"], "DPANIC");
    }

    #[test]
    #[should_panic(expected = "invariant broken")]
    fn test_dpanic_with_assert_panics() {
        let options = LoggerOptions {
            panic_on_assert: true,
            ..LoggerOptions::default()
        };
        let (logger, _buffer) = json_logger(LogLevel::Debug, options);
        logger.panic("invariant broken");
    }

    #[test]
    fn test_panic_ln_always_panics_after_writing() {
        let (logger, buffer) = json_logger(LogLevel::Debug, LoggerOptions::default());
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            logger.panic_ln(&[&"fatal", &"state"]);
        }));
        assert!(result.is_err());

        let lines = parsed(&buffer);
        assert_eq!(lines[0]["lv"], "PANIC");
        assert_eq!(lines[0]["msg"], "fatal state");
    }

    struct UnflushableAppender(ConsoleAppender);

    impl Appender for UnflushableAppender {
        fn append(&mut self, line: &str) -> Result<()> {
            self.0.append(line)
        }

        fn flush(&mut self) -> Result<()> {
            Err(LoggerError::writer("disk detached"))
        }

        fn name(&self) -> &str {
            "unflushable"
        }
    }

    #[test]
    fn test_panic_paths_report_flush_failure() {
        let buffer = SharedBuffer::new();
        let core = Core::new(
            Encoder::json(EncoderConfig::production()),
            UnflushableAppender(ConsoleAppender::with_writer("buffer", buffer.clone())),
            LevelRange::at_least(LogLevel::Debug),
        );
        let options = LoggerOptions {
            panic_on_assert: true,
            ..LoggerOptions::default()
        };
        let logger = Logger::from_tee(Tee::new(vec![core]), options);

        let ln = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            logger.panic_ln(&[&"state", &"lost"]);
        }));
        let dpanic = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            logger.panic("invariant broken");
        }));

        assert!(ln.is_err());
        assert!(dpanic.is_err());
        assert_eq!(logger.metrics().failed_flush_count(), 2);
        assert_eq!(buffer.lines().len(), 2);
    }

    #[test]
    fn test_log_crate_record() {
        let (logger, buffer) = json_logger(LogLevel::Info, LoggerOptions::default());
        logger.log_record(
            &log::Record::builder()
                .args(format_args!("from log {}", 1))
                .level(log::Level::Warn)
                .target("app::db")
                .file(Some("src/db/pool.rs"))
                .line(Some(9))
                .build(),
        );

        let line = &parsed(&buffer)[0];
        assert_eq!(line["lv"], "WARN");
        assert_eq!(line["msg"], "from log 1");
        assert_eq!(line["target"], "app::db");
        assert_eq!(line["caller"], "db/pool.rs:9");
    }

    #[test]
    fn test_max_log_filter() {
        let (info, _) = json_logger(LogLevel::Info, LoggerOptions::default());
        assert_eq!(info.max_log_filter(), log::LevelFilter::Info);
        let (debug, _) = json_logger(LogLevel::Debug, LoggerOptions::default());
        assert_eq!(debug.max_log_filter(), log::LevelFilter::Trace);
        assert_eq!(Logger::noop().max_log_filter(), log::LevelFilter::Off);
    }

    #[test]
    fn test_noop_logger_discards() {
        let logger = Logger::default();
        logger.error("nowhere");
        assert_eq!(logger.metrics().total_written(), 0);
        assert!(logger.sync().is_ok());
        assert!(format!("{:?}", logger).contains("cores: 0"));
    }
}
