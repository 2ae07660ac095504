//! Error types shared across the Callsight crates.
//!
//! The storage error lives here rather than in `callsight-store` so that
//! callers can match on it without depending on the backend crate. The
//! taxonomy is shallow by design: not-found, invalid input, and the backend
//! failures that are surfaced to the caller as-is.

use thiserror::Error;

/// Errors produced by the transcript store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind, e.g. "transcript" or "analysis".
        entity: &'static str,
        id: String,
    },

    #[error("invalid database path: {reason}")]
    InvalidPath { reason: String },

    #[error("database connection failed: {reason}")]
    ConnectionFailed { reason: String },

    #[error("database query failed: {reason}")]
    QueryFailed { reason: String },

    #[error("migration {version} failed: {reason}")]
    MigrationFailed { version: u32, reason: String },

    /// A stored row holds a value the domain types cannot represent,
    /// e.g. an unknown intent label.
    #[error("corrupt {entity} row {id}: {reason}")]
    CorruptRecord {
        entity: &'static str,
        id: String,
        reason: String,
    },

    #[error(transparent)]
    InvalidId(#[from] crate::identifiers::IdValidationError),
}

impl StoreError {
    /// Not-found constructor for transcript lookups.
    pub fn transcript_not_found(id: crate::TranscriptId) -> Self {
        StoreError::NotFound {
            entity: "transcript",
            id: id.to_string(),
        }
    }

    /// Not-found constructor for analysis lookups.
    pub fn analysis_not_found(id: crate::AnalysisId) -> Self {
        StoreError::NotFound {
            entity: "analysis",
            id: id.to_string(),
        }
    }

    /// Whether this error is a not-found indication rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
