//! Snag Core
//!
//! Core types and abstractions shared by the snag crates.
//!
//! This crate contains:
//! - Domain types: log levels, severity tiers, log records and exceptions
//! - Formatting: the line formatter used to render a record's text

pub mod domain;
pub mod format;

pub use domain::exception::ExceptionRef;
pub use domain::level::{Level, ParseLevelError};
pub use domain::record::{Context, LogRecord, Metadata};
pub use domain::severity::{LevelSeverityMap, ParseSeverityError, Severity, resolve_severity};
pub use format::{Formatter, LineFormatter};
