//! Core logger types and traits

pub mod appender;
pub mod encoder;
pub mod error;
pub mod fields;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod mode;
pub mod tee;
pub mod timestamp;

pub use appender::Appender;
pub use encoder::{
    CallerEncoder, Encoder, EncoderConfig, Encoding, LevelEncoder, RESERVED_FIELD_PREFIX,
};
pub use error::{LoggerError, Result};
pub use fields::{FieldValue, Fields};
pub use log_entry::{Caller, LogEntry};
pub use log_level::{LevelRange, LogLevel, Severity};
pub use logger::{Logger, LoggerOptions, FATAL_EXIT_CODE};
pub use metrics::LoggerMetrics;
pub use mode::Mode;
pub use tee::{Core, Tee};
pub use timestamp::TimestampFormat;
