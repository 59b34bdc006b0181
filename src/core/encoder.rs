//! Entry encoders
//!
//! Two encodings are supported:
//! - Console: tab-separated, human-readable line
//! - Json: one JSON object per line
//!
//! Key names, level rendering, time and caller rendering come from an
//! [`EncoderConfig`], which has one preset per [`Mode`].

use super::error::Result;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::mode::Mode;
use super::timestamp::TimestampFormat;
use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Prefix given to a user field whose key collides with a component key,
/// so `msg` becomes `fields.msg` in production JSON
pub const RESERVED_FIELD_PREFIX: &str = "fields.";

/// How the level is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelEncoder {
    /// `INFO`
    #[default]
    Capital,
    /// `INFO` wrapped in terminal color codes; the JSON encoder falls back to
    /// `Capital`
    CapitalColor,
}

/// How the caller is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CallerEncoder {
    /// `dir/file.rs:line`
    #[default]
    Short,
    /// Full path as recorded by the compiler
    Full,
}

/// Key names and renderers shared by both encodings
///
/// An empty key omits that component from the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    pub time_key: String,
    pub level_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub message_key: String,
    pub stacktrace_key: String,
    pub level_encoder: LevelEncoder,
    pub time_format: TimestampFormat,
    pub caller_encoder: CallerEncoder,
}

impl EncoderConfig {
    pub fn development() -> Self {
        Self {
            time_key: "timestamp".to_string(),
            level_key: "level".to_string(),
            name_key: "logger".to_string(),
            caller_key: "caller".to_string(),
            message_key: "message".to_string(),
            stacktrace_key: "stacktrace".to_string(),
            level_encoder: LevelEncoder::CapitalColor,
            time_format: TimestampFormat::Rfc3339,
            caller_encoder: CallerEncoder::Short,
        }
    }

    pub fn production() -> Self {
        Self {
            time_key: "ts".to_string(),
            level_key: "lv".to_string(),
            name_key: "logger".to_string(),
            caller_key: "caller".to_string(),
            message_key: "msg".to_string(),
            stacktrace_key: "stacktrace".to_string(),
            level_encoder: LevelEncoder::Capital,
            time_format: TimestampFormat::Rfc3339,
            caller_encoder: CallerEncoder::Short,
        }
    }

    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Development => Self::development(),
            Mode::Production => Self::production(),
        }
    }

    /// Whether `key` names one of the entry's own components
    pub fn is_reserved(&self, key: &str) -> bool {
        [
            &self.time_key,
            &self.level_key,
            &self.name_key,
            &self.caller_key,
            &self.message_key,
            &self.stacktrace_key,
        ]
        .iter()
        .any(|reserved| !reserved.is_empty() && reserved.as_str() == key)
    }

    fn caller(&self, entry: &LogEntry) -> Option<String> {
        entry.caller.as_ref().map(|caller| match self.caller_encoder {
            CallerEncoder::Short => caller.short(),
            CallerEncoder::Full => caller.full(),
        })
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::development()
    }
}

/// Output encoding for log entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Console,
    Json,
}

/// Turns a [`LogEntry`] into one output line (without the trailing newline)
#[derive(Debug, Clone)]
pub struct Encoder {
    encoding: Encoding,
    config: EncoderConfig,
}

impl Encoder {
    pub fn new(encoding: Encoding, config: EncoderConfig) -> Self {
        Self { encoding, config }
    }

    pub fn console(config: EncoderConfig) -> Self {
        Self::new(Encoding::Console, config)
    }

    pub fn json(config: EncoderConfig) -> Self {
        Self::new(Encoding::Json, config)
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn encode(&self, entry: &LogEntry) -> Result<String> {
        match self.encoding {
            Encoding::Console => Ok(self.encode_console(entry)),
            Encoding::Json => self.encode_json(entry),
        }
    }

    fn encode_console(&self, entry: &LogEntry) -> String {
        let cfg = &self.config;
        let mut parts: Vec<String> = Vec::with_capacity(6);

        if !cfg.time_key.is_empty() {
            parts.push(cfg.time_format.format(&entry.timestamp));
        }
        if !cfg.level_key.is_empty() {
            parts.push(render_level(entry.level, cfg.level_encoder));
        }
        if !cfg.name_key.is_empty() {
            if let Some(name) = entry.logger_name.as_deref().filter(|n| !n.is_empty()) {
                parts.push(name.to_string());
            }
        }
        if !cfg.caller_key.is_empty() {
            if let Some(caller) = cfg.caller(entry) {
                parts.push(caller);
            }
        }
        if !cfg.message_key.is_empty() {
            parts.push(sanitize_message(&entry.message));
        }
        if !entry.fields.is_empty() {
            parts.push(serde_json::Value::Object(entry.fields.to_json_object()).to_string());
        }

        let mut line = parts.join("\t");
        if !cfg.stacktrace_key.is_empty() {
            if let Some(ref stacktrace) = entry.stacktrace {
                line.push('\n');
                line.push_str(stacktrace.trim_end());
            }
        }
        line
    }

    fn encode_json(&self, entry: &LogEntry) -> Result<String> {
        let cfg = &self.config;
        let mut obj = serde_json::Map::new();

        if !cfg.level_key.is_empty() {
            obj.insert(
                cfg.level_key.clone(),
                serde_json::Value::String(entry.level.to_str().to_string()),
            );
        }
        if !cfg.time_key.is_empty() {
            obj.insert(cfg.time_key.clone(), cfg.time_format.to_json_value(&entry.timestamp));
        }
        if !cfg.name_key.is_empty() {
            if let Some(name) = entry.logger_name.as_deref().filter(|n| !n.is_empty()) {
                obj.insert(cfg.name_key.clone(), serde_json::Value::String(name.to_string()));
            }
        }
        if !cfg.caller_key.is_empty() {
            if let Some(caller) = cfg.caller(entry) {
                obj.insert(cfg.caller_key.clone(), serde_json::Value::String(caller));
            }
        }
        if !cfg.message_key.is_empty() {
            obj.insert(
                cfg.message_key.clone(),
                serde_json::Value::String(entry.message.clone()),
            );
        }
        if !cfg.stacktrace_key.is_empty() {
            if let Some(ref stacktrace) = entry.stacktrace {
                obj.insert(
                    cfg.stacktrace_key.clone(),
                    serde_json::Value::String(stacktrace.clone()),
                );
            }
        }
        for (key, value) in entry.fields.iter() {
            let key = if cfg.is_reserved(key) {
                format!("{}{}", RESERVED_FIELD_PREFIX, key)
            } else {
                key.to_string()
            };
            obj.insert(key, value.to_json_value());
        }

        Ok(serde_json::to_string(&serde_json::Value::Object(obj))?)
    }
}

fn render_level(level: LogLevel, encoder: LevelEncoder) -> String {
    match encoder {
        LevelEncoder::Capital => level.to_str().to_string(),
        LevelEncoder::CapitalColor => level.to_str().color(level.color_code()).to_string(),
    }
}

/// Escape line breaks and tabs so one entry stays on one console line
fn sanitize_message(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fields::Fields;
    use crate::core::log_entry::Caller;

    fn sample_entry(level: LogLevel, message: &str) -> LogEntry {
        let mut entry = LogEntry::new(level, message).with_logger_name(Some("svc"));
        entry.caller = Some(Caller {
            file: "src/app/handler.rs".to_string(),
            line: 17,
        });
        entry
    }

    #[test]
    fn test_production_json_keys() {
        let encoder = Encoder::json(EncoderConfig::production());
        let line = encoder.encode(&sample_entry(LogLevel::Info, "started")).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["lv"], "INFO");
        assert_eq!(parsed["msg"], "started");
        assert_eq!(parsed["logger"], "svc");
        assert_eq!(parsed["caller"], "app/handler.rs:17");
        assert!(parsed["ts"].is_string());
        assert!(parsed.get("message").is_none());
        assert!(parsed.get("stacktrace").is_none());
    }

    #[test]
    fn test_development_json_keys_are_uncolored() {
        let encoder = Encoder::json(EncoderConfig::development());
        let line = encoder.encode(&sample_entry(LogLevel::Warn, "slow")).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["level"], "WARN");
        assert_eq!(parsed["message"], "slow");
        assert!(parsed["timestamp"].is_string());
    }

    #[test]
    fn test_json_key_order() {
        let encoder = Encoder::json(EncoderConfig::production());
        let entry = sample_entry(LogLevel::Error, "boom")
            .with_fields(Fields::new().with("attempt", 3))
            .with_stacktrace("at main".to_string());
        let line = encoder.encode(&entry).unwrap();

        let positions: Vec<usize> = ["\"lv\"", "\"ts\"", "\"logger\"", "\"caller\"", "\"msg\"", "\"stacktrace\"", "\"attempt\""]
            .iter()
            .map(|key| line.find(key).expect("key present"))
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_colliding_fields_cannot_replace_components() {
        let encoder = Encoder::json(EncoderConfig::production());
        let entry = sample_entry(LogLevel::Info, "real message").with_fields(
            Fields::new()
                .with("msg", "user data")
                .with("lv", "DEBUG")
                .with("ts", 0)
                .with("logger", "other")
                .with("caller", "elsewhere.rs:1")
                .with("stacktrace", "fake")
                .with("user", "kept"),
        );
        let line = encoder.encode(&entry).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["lv"], "INFO");
        assert_eq!(parsed["msg"], "real message");
        assert_eq!(parsed["logger"], "svc");
        assert_eq!(parsed["caller"], "app/handler.rs:17");
        assert!(parsed["ts"].is_string());
        assert!(parsed.get("stacktrace").is_none());

        assert_eq!(parsed["fields.msg"], "user data");
        assert_eq!(parsed["fields.lv"], "DEBUG");
        assert_eq!(parsed["fields.ts"], 0);
        assert_eq!(parsed["fields.logger"], "other");
        assert_eq!(parsed["fields.caller"], "elsewhere.rs:1");
        assert_eq!(parsed["fields.stacktrace"], "fake");
        assert_eq!(parsed["user"], "kept");
    }

    #[test]
    fn test_reserved_keys_follow_config() {
        let dev = EncoderConfig::development();
        assert!(dev.is_reserved("message"));
        assert!(!dev.is_reserved("msg"));

        let mut config = EncoderConfig::production();
        config.caller_key.clear();
        assert!(!config.is_reserved("caller"));
        assert!(!config.is_reserved(""));
    }

    #[test]
    fn test_json_escapes_newlines() {
        let encoder = Encoder::json(EncoderConfig::production());
        let line = encoder
            .encode(&sample_entry(LogLevel::Info, "line one\nline two"))
            .unwrap();
        assert!(!line.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["msg"], "line one\nline two");
    }

    #[test]
    fn test_console_layout() {
        let encoder = Encoder::console(EncoderConfig::production());
        let entry = sample_entry(LogLevel::Info, "started")
            .with_fields(Fields::new().with("port", 8080));
        let line = encoder.encode(&entry).unwrap();

        let parts: Vec<&str> = line.split('\t').collect();
        assert_eq!(parts.len(), 6);
        assert_eq!(parts[1], "INFO");
        assert_eq!(parts[2], "svc");
        assert_eq!(parts[3], "app/handler.rs:17");
        assert_eq!(parts[4], "started");
        assert_eq!(parts[5], r#"{"port":8080}"#);
    }

    #[test]
    fn test_console_sanitizes_message() {
        let encoder = Encoder::console(EncoderConfig::production());
        let line = encoder
            .encode(&sample_entry(LogLevel::Info, "User login\nERROR fake"))
            .unwrap();
        assert!(!line.contains('\n'));
        assert!(line.contains("User login\\nERROR fake"));
    }

    #[test]
    fn test_console_stacktrace_on_next_line() {
        let encoder = Encoder::console(EncoderConfig::production());
        let entry = sample_entry(LogLevel::Error, "boom").with_stacktrace("frame 0\n".to_string());
        let line = encoder.encode(&entry).unwrap();
        assert_eq!(line.lines().count(), 2);
        assert_eq!(line.lines().nth(1), Some("frame 0"));
    }

    #[test]
    fn test_empty_key_omits_component() {
        let mut config = EncoderConfig::production();
        config.time_key.clear();
        config.caller_key.clear();
        let line = Encoder::console(config)
            .encode(&sample_entry(LogLevel::Info, "hi"))
            .unwrap();
        assert_eq!(line, "INFO\tsvc\thi");
    }

    #[test]
    fn test_full_caller_encoder() {
        let mut config = EncoderConfig::production();
        config.caller_encoder = CallerEncoder::Full;
        let line = Encoder::json(config)
            .encode(&sample_entry(LogLevel::Info, "hi"))
            .unwrap();
        assert!(line.contains("src/app/handler.rs:17"));
    }

    #[test]
    fn test_for_mode() {
        assert_eq!(EncoderConfig::for_mode(Mode::Production).message_key, "msg");
        assert_eq!(EncoderConfig::for_mode(Mode::Development).message_key, "message");
        assert_eq!(EncoderConfig::default(), EncoderConfig::development());
    }
}
