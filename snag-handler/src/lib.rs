//! Snag log handlers
//!
//! This crate connects log records to a reporting client:
//! - [`Handler`] / [`ProcessingHandler`]: the handler capability and its
//!   gating and formatting pipeline
//! - [`SeverityMappingHandler`]: maps levels to severity tiers and submits one
//!   report per record
//! - [`HandlerStack`]: an ordered handler chain honouring the bubble flag
//! - [`ReportingLayer`]: a `tracing` layer feeding events into a stack

pub mod error;
pub mod handler;
pub mod layer;
pub mod severity_mapping;
pub mod stack;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{HandlerError, Result};
pub use handler::{Handler, ProcessingHandler};
pub use layer::ReportingLayer;
pub use severity_mapping::SeverityMappingHandler;
pub use stack::HandlerStack;
