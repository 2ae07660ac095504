//! Call transcript records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::{CustomerId, TranscriptId};

/// A transcript as submitted for storage, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTranscript {
    pub customer_id: CustomerId,
    pub customer_name: String,
    /// Raw call text.
    pub text: String,
    pub duration_seconds: u32,
    pub phone_number: String,
}

/// A stored call transcript. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub id: TranscriptId,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub text: String,
    pub call_date: DateTime<Utc>,
    pub duration_seconds: u32,
    pub phone_number: String,
}

/// Listing projection of a transcript, without the call text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptSummary {
    pub id: TranscriptId,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub duration_seconds: u32,
    pub call_date: DateTime<Utc>,
}
