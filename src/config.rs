//! Logger configuration and composition
//!
//! [`LoggerConfig`] turns a name, a [`Mode`], a minimum [`Severity`] and
//! optional file paths into a [`Logger`]:
//!
//! - a console core for `[floor, Error)` writing to stdout,
//! - a console core for `[max(floor, Error), ∞)` writing to stderr,
//! - when file paths are given, one JSON core for `[floor, ∞)` writing to
//!   every path through size-rotated files.
//!
//! # Example
//!
//! ```no_run
//! use rust_logger_facade::prelude::*;
//!
//! let logger = LoggerConfig::new("svc", Mode::Production, Severity::Info)
//!     .with_file_path("/var/log/svc.json")
//!     .build()
//!     .unwrap();
//! logger.info("started");
//! ```

use crate::appenders::{Appender, ConsoleAppender, MultiAppender, RotatingFileAppender, RotationPolicy};
use crate::core::{
    Core, Encoder, EncoderConfig, LevelRange, LogLevel, Logger, LoggerError, LoggerOptions, Mode,
    Result, Severity, Tee,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Declarative logger configuration
///
/// Deserialisable so a host application can embed it in its own
/// configuration file; every field except `name` has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub name: String,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub min_severity: Severity,
    #[serde(default)]
    pub file_paths: Vec<PathBuf>,
    #[serde(default)]
    pub rotation: RotationPolicy,
    /// Panic after logging at `DPanic`; off unless asked for, in both modes
    #[serde(default)]
    pub panic_on_assert: bool,
    #[serde(default = "default_add_caller")]
    pub add_caller: bool,
    #[serde(default)]
    pub stacktrace_level: Option<LogLevel>,
}

fn default_add_caller() -> bool {
    true
}

impl LoggerConfig {
    pub fn new(name: impl Into<String>, mode: Mode, min_severity: Severity) -> Self {
        Self {
            name: name.into(),
            mode,
            min_severity,
            file_paths: Vec::new(),
            rotation: RotationPolicy::default(),
            panic_on_assert: false,
            add_caller: true,
            stacktrace_level: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_file_path(mut self, path: impl AsRef<Path>) -> Self {
        self.file_paths.push(path.as_ref().to_path_buf());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_file_paths<I>(mut self, paths: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        self.file_paths
            .extend(paths.into_iter().map(|p| p.as_ref().to_path_buf()));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_rotation(mut self, policy: RotationPolicy) -> Self {
        self.rotation = policy;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_panic_on_assert(mut self, enabled: bool) -> Self {
        self.panic_on_assert = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_caller(mut self, enabled: bool) -> Self {
        self.add_caller = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_stacktrace_level(mut self, level: Option<LogLevel>) -> Self {
        self.stacktrace_level = level;
        self
    }

    /// Options every handle built from this config carries
    pub fn options(&self) -> LoggerOptions {
        LoggerOptions {
            panic_on_assert: self.panic_on_assert,
            add_caller: self.add_caller,
            stacktrace_level: self.stacktrace_level,
        }
    }

    /// Reject configurations that cannot be built
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for an empty file path or a zero size
    /// limit
    pub fn validate(&self) -> Result<()> {
        if self.file_paths.iter().any(|p| p.as_os_str().is_empty()) {
            return Err(LoggerError::config("LoggerConfig", "file path must not be empty"));
        }
        if self.rotation.max_bytes == 0 {
            return Err(LoggerError::config(
                "RotationPolicy",
                "max_bytes must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Build a logger writing to the process's stdout/stderr
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a log file cannot
    /// be created, opened, or locked
    pub fn build(&self) -> Result<Logger> {
        self.build_with_console(ConsoleAppender::stdout(), ConsoleAppender::stderr())
    }

    /// Build a logger whose console cores write to the given appenders
    /// instead of stdout/stderr
    ///
    /// # Errors
    ///
    /// Same as [`LoggerConfig::build`]
    pub fn build_with_console(
        &self,
        out: impl Appender + 'static,
        err: impl Appender + 'static,
    ) -> Result<Logger> {
        self.validate()?;

        let floor = self.min_severity.priority();
        let encoder_config = EncoderConfig::for_mode(self.mode);

        let mut cores = console_cores(floor, &encoder_config, out, err);
        if !self.file_paths.is_empty() {
            cores.push(self.file_core(floor, &encoder_config)?);
        }

        Ok(Logger::from_tee(Tee::new(cores), self.options()).named(&self.name))
    }

    fn file_core(&self, floor: LogLevel, encoder_config: &EncoderConfig) -> Result<Core> {
        let mut seen: Vec<PathBuf> = Vec::with_capacity(self.file_paths.len());
        let mut files: Vec<Box<dyn Appender>> = Vec::with_capacity(self.file_paths.len());

        for path in &self.file_paths {
            if seen.contains(&file_identity(path)) {
                continue;
            }
            files.push(Box::new(RotatingFileAppender::with_policy(
                path,
                self.rotation.clone(),
            )?));
            // Recomputed once the parent directory exists
            seen.push(file_identity(path));
        }

        Ok(Core::new(
            Encoder::json(encoder_config.clone()),
            MultiAppender::new(files),
            LevelRange::at_least(floor),
        ))
    }
}

/// Canonical parent directory joined with the file name, so `./a.json` and
/// `a.json` name the same file; falls back to the absolute path while the
/// parent is missing
fn file_identity(path: &Path) -> PathBuf {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    match (fs::canonicalize(parent), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    }
}

/// Console cores sharing one floor: `[floor, Error)` to `out` and
/// `[max(floor, Error), ∞)` to `err`
fn console_cores(
    floor: LogLevel,
    encoder_config: &EncoderConfig,
    out: impl Appender + 'static,
    err: impl Appender + 'static,
) -> Vec<Core> {
    vec![
        Core::new(
            Encoder::console(encoder_config.clone()),
            out,
            LevelRange::between(floor, LogLevel::Error),
        ),
        Core::new(
            Encoder::console(encoder_config.clone()),
            err,
            LevelRange::at_least(floor.max(LogLevel::Error)),
        ),
    ]
}

impl Logger {
    /// Build a logger from its four essentials
    ///
    /// ```no_run
    /// use rust_logger_facade::prelude::*;
    ///
    /// let logger = Logger::new("svc", Mode::Production, Severity::Info, ["/tmp/log.json"]).unwrap();
    /// logger.info("started");
    /// logger.error("boom");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if a log file cannot be created or opened
    pub fn new<I>(name: &str, mode: Mode, min_severity: Severity, file_paths: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        LoggerConfig::new(name, mode, min_severity)
            .with_file_paths(file_paths)
            .build()
    }

    /// Console-only logger
    pub fn console(name: &str, mode: Mode, min_severity: Severity) -> Self {
        LoggerConfig::new(name, mode, min_severity)
            .build()
            .unwrap_or_else(|e| {
                eprintln!("[LOGGER ERROR] Failed to build console logger: {}", e);
                Logger::noop()
            })
    }
}
