//! Timestamp formatting utilities
//!
//! Entries carry local wall-clock time; encoders render it with one of the
//! formats below.

use chrono::{DateTime, Local, SecondsFormat};
use serde::{Deserialize, Serialize};

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use rust_logger_facade::core::TimestampFormat;
/// use chrono::Local;
///
/// let format = TimestampFormat::Rfc3339;
/// let timestamp = format.format(&Local::now());
/// assert!(timestamp.contains('T'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// RFC 3339 with second precision and local offset: `2025-01-08T10:30:45+01:00`
    #[default]
    Rfc3339,

    /// RFC 3339 with nanosecond precision: `2025-01-08T10:30:45.123456789+01:00`
    Rfc3339Nano,

    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123+0100`
    Iso8601,

    /// Unix timestamp in milliseconds: `1736332245123`
    ///
    /// Rendered as a JSON number by the JSON encoder.
    EpochMillis,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Local>) -> String {
        match self {
            TimestampFormat::Rfc3339 => datetime.to_rfc3339_opts(SecondsFormat::Secs, true),
            TimestampFormat::Rfc3339Nano => datetime.to_rfc3339_opts(SecondsFormat::Nanos, true),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string(),
            TimestampFormat::EpochMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    /// Render for the JSON encoder: numeric formats become JSON numbers
    #[must_use]
    pub fn to_json_value(&self, datetime: &DateTime<Local>) -> serde_json::Value {
        match self {
            TimestampFormat::EpochMillis => serde_json::Value::from(datetime.timestamp_millis()),
            other => serde_json::Value::String(other.format(datetime)),
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::EpochMillis)
    }
}
