//! Log entry structure

use super::fields::Fields;
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::panic::Location;

/// A single event offered to every core of a logger
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
    /// Dotted logger name, `None` for an unnamed logger
    pub logger_name: Option<String>,
    pub caller: Option<Caller>,
    pub fields: Fields,
    pub stacktrace: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Local::now(),
            logger_name: None,
            caller: None,
            fields: Fields::new(),
            stacktrace: None,
        }
    }

    pub fn with_logger_name(mut self, name: Option<&str>) -> Self {
        self.logger_name = name.map(str::to_string);
        self
    }

    pub fn with_caller(mut self, location: &Location<'_>) -> Self {
        self.caller = Some(Caller::from(location));
        self
    }

    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_stacktrace(mut self, stacktrace: String) -> Self {
        self.stacktrace = Some(stacktrace);
        self
    }
}

/// Source location of a logging call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub file: String,
    pub line: u32,
}

impl Caller {
    /// `dir/file.rs:line`, keeping only the last directory component
    pub fn short(&self) -> String {
        let normalized = self.file.replace('\\', "/");
        let mut parts = normalized.rsplitn(3, '/');
        let file = parts.next().unwrap_or_default();
        match parts.next() {
            Some(dir) => format!("{}/{}:{}", dir, file, self.line),
            None => format!("{}:{}", file, self.line),
        }
    }

    pub fn full(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }
}

impl From<&Location<'_>> for Caller {
    fn from(location: &Location<'_>) -> Self {
        Self {
            file: location.file().to_string(),
            line: location.line(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_caller() {
        let caller = Caller {
            file: "src/core/logger.rs".to_string(),
            line: 42,
        };
        assert_eq!(caller.short(), "core/logger.rs:42");
        assert_eq!(caller.full(), "src/core/logger.rs:42");

        let bare = Caller {
            file: "main.rs".to_string(),
            line: 7,
        };
        assert_eq!(bare.short(), "main.rs:7");
    }

    #[test]
    fn test_windows_separators() {
        let caller = Caller {
            file: r"src\appenders\console.rs".to_string(),
            line: 3,
        };
        assert_eq!(caller.short(), "appenders/console.rs:3");
    }

    #[test]
    fn test_caller_from_location() {
        let entry = LogEntry::new(LogLevel::Info, "here").with_caller(Location::caller());
        let caller = entry.caller.expect("caller recorded");
        assert!(caller.file.ends_with("log_entry.rs"));
        assert!(caller.line > 0);
    }

    #[test]
    fn test_builder_methods() {
        let entry = LogEntry::new(LogLevel::Warn, "disk")
            .with_logger_name(Some("svc.storage"))
            .with_fields(Fields::new().with("free_mb", 12))
            .with_stacktrace("frame".to_string());
        assert_eq!(entry.logger_name.as_deref(), Some("svc.storage"));
        assert_eq!(entry.fields.len(), 1);
        assert!(entry.stacktrace.is_some());
    }
}
