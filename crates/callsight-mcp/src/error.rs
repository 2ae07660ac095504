//! Error types for the MCP server layer.

use callsight_core::StoreError;
use thiserror::Error;

/// MCP server result type.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while serving the Callsight tools.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Persistence failure, surfaced to the caller as-is.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(String),
}
