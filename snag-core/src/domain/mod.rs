//! Core domain types
//!
//! These types describe a log event as the logging side sees it (level,
//! record, attached exception) and the severity tier the reporting side
//! accepts.

pub mod exception;
pub mod level;
pub mod record;
pub mod severity;
