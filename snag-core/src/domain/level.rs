//! Log level domain type

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Severity of a log record, as an ordinal.
///
/// The eight standard levels follow the RFC 5424 ladder used by most
/// logging frameworks. Any other ordinal can still be carried through a
/// record; consumers decide how to treat it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(u16);

impl Level {
    /// Detailed debug information
    pub const DEBUG: Level = Level(100);
    /// Interesting events
    pub const INFO: Level = Level(200);
    /// Uncommon events
    pub const NOTICE: Level = Level(250);
    /// Exceptional occurrences that are not errors
    pub const WARNING: Level = Level(300);
    /// Runtime errors
    pub const ERROR: Level = Level(400);
    /// Critical conditions
    pub const CRITICAL: Level = Level(500);
    /// Action must be taken immediately
    pub const ALERT: Level = Level(550);
    /// The system is unusable
    pub const EMERGENCY: Level = Level(600);

    /// All standard levels, most verbose first
    pub const ALL: [Level; 8] = [
        Level::DEBUG,
        Level::INFO,
        Level::NOTICE,
        Level::WARNING,
        Level::ERROR,
        Level::CRITICAL,
        Level::ALERT,
        Level::EMERGENCY,
    ];

    /// Wraps a raw ordinal, known or not
    pub const fn from_ordinal(ordinal: u16) -> Self {
        Self(ordinal)
    }

    pub const fn ordinal(self) -> u16 {
        self.0
    }

    /// Upper-case name of a standard level, `None` for unknown ordinals
    pub fn name(self) -> Option<&'static str> {
        match self.0 {
            100 => Some("DEBUG"),
            200 => Some("INFO"),
            250 => Some("NOTICE"),
            300 => Some("WARNING"),
            400 => Some("ERROR"),
            500 => Some("CRITICAL"),
            550 => Some("ALERT"),
            600 => Some("EMERGENCY"),
            _ => None,
        }
    }

    pub fn is_standard(self) -> bool {
        self.name().is_some()
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::DEBUG
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Error returned when a string is neither a level name nor an ordinal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log level: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(ordinal) = trimmed.parse::<u16>() {
            return Ok(Level(ordinal));
        }

        match trimmed.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Level::DEBUG),
            "INFO" => Ok(Level::INFO),
            "NOTICE" => Ok(Level::NOTICE),
            "WARNING" | "WARN" => Ok(Level::WARNING),
            "ERROR" => Ok(Level::ERROR),
            "CRITICAL" => Ok(Level::CRITICAL),
            "ALERT" => Ok(Level::ALERT),
            "EMERGENCY" => Ok(Level::EMERGENCY),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}
