use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// Source level of a log event, ordered from least to most severe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum Level {
    Verbose = 0,
    Debug = 1,
    Information = 2,
    Warning = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    pub const ALL: [Level; 6] = [
        Self::Verbose,
        Self::Debug,
        Self::Information,
        Self::Warning,
        Self::Error,
        Self::Fatal,
    ];

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(usize::from(ordinal)).copied()
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verbose => "Verbose",
            Self::Debug => "Debug",
            Self::Information => "Information",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Fatal => "Fatal",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verbose" | "vrb" | "trace" => Ok(Self::Verbose),
            "debug" | "dbg" => Ok(Self::Debug),
            "information" | "info" | "inf" => Ok(Self::Information),
            "warning" | "warn" | "wrn" => Ok(Self::Warning),
            "error" | "err" | "eror" => Ok(Self::Error),
            "fatal" | "ftl" | "critical" => Ok(Self::Fatal),
            _ => Err(BridgeError::Parse(format!("unknown level: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parse_accepts_aliases() {
        assert_eq!(Level::from_str("warn").unwrap(), Level::Warning);
        assert_eq!(Level::from_str("INF").unwrap(), Level::Information);
        assert_eq!(Level::from_str("Verbose").unwrap(), Level::Verbose);
        assert!(Level::from_str("loud").is_err());
    }

    #[test]
    fn ordinals_round_trip_and_stop_at_fatal() {
        for level in Level::ALL {
            assert_eq!(Level::from_ordinal(level.ordinal()), Some(level));
        }
        assert_eq!(Level::from_ordinal(6), None);
        assert!(Level::Verbose < Level::Fatal);
    }

    #[test]
    fn display_is_the_source_name() {
        assert_eq!(Level::Warning.to_string(), "Warning");
    }
}
