//! Operating mode

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selects encoder key names and level coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    pub fn is_production(&self) -> bool {
        matches!(self, Mode::Production)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Development => f.write_str("development"),
            Mode::Production => f.write_str("production"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Mode::Development),
            "production" | "prod" => Ok(Mode::Production),
            _ => Err(format!("Invalid mode: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!("PROD".parse::<Mode>(), Ok(Mode::Production));
        assert_eq!("dev".parse::<Mode>(), Ok(Mode::Development));
        assert!("staging".parse::<Mode>().is_err());
        assert_eq!(Mode::default(), Mode::Development);
    }

    #[test]
    fn test_mode_serde() {
        let mode: Mode = serde_json::from_str("\"production\"").unwrap();
        assert!(mode.is_production());
        assert_eq!(serde_json::to_string(&Mode::Development).unwrap(), "\"development\"");
    }
}
