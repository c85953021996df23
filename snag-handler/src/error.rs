//! Error types for log handlers

use snag_client::ClientError;
use thiserror::Error;

/// Result type alias for handler operations
pub type Result<T> = std::result::Result<T, HandlerError>;

/// Errors raised while handling a record
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The reporting client refused the submission
    #[error("Reporting client error: {0}")]
    Client(#[from] ClientError),
}
