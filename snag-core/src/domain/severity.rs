//! Severity tiers and the level to severity table

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::level::Level;

/// The three severity tiers accepted by the reporting service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown severity: {0} (expected info, warning or error)")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

static STANDARD_TABLE: [(Level, Severity); 8] = [
    (Level::DEBUG, Severity::Info),
    (Level::INFO, Severity::Info),
    (Level::NOTICE, Severity::Info),
    (Level::WARNING, Severity::Warning),
    (Level::ERROR, Severity::Error),
    (Level::CRITICAL, Severity::Error),
    (Level::ALERT, Severity::Error),
    (Level::EMERGENCY, Severity::Error),
];

/// Read-only mapping from log levels to severity tiers
///
/// Lookups are total: a level missing from the table resolves to the
/// fallback tier, so an event is never dropped for having an odd level.
#[derive(Debug, Clone, Copy)]
pub struct LevelSeverityMap {
    entries: &'static [(Level, Severity)],
    fallback: Severity,
}

impl LevelSeverityMap {
    /// The standard table: debug/info/notice are info, warning is warning,
    /// everything from error up is error. Unknown levels fall back to error.
    pub const fn standard() -> Self {
        Self {
            entries: &STANDARD_TABLE,
            fallback: Severity::Error,
        }
    }

    pub fn resolve(&self, level: Level) -> Severity {
        self.entries
            .iter()
            .find(|(known, _)| *known == level)
            .map(|(_, severity)| *severity)
            .unwrap_or(self.fallback)
    }

    pub fn fallback(&self) -> Severity {
        self.fallback
    }

    pub fn entries(&self) -> impl Iterator<Item = (Level, Severity)> + '_ {
        self.entries.iter().copied()
    }
}

impl Default for LevelSeverityMap {
    fn default() -> Self {
        Self::standard()
    }
}

/// Resolves a level against the standard table
pub fn resolve_severity(level: Level) -> Severity {
    LevelSeverityMap::standard().resolve(level)
}
