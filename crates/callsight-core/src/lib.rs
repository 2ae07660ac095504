//! # Callsight Core
//!
//! Domain types and the classification engine for the Callsight call
//! transcript analysis pipeline. This crate has no I/O: it defines the
//! validated identifiers, the transcript and analysis records shared by the
//! storage and server crates, and the pure keyword classifier.

pub mod analysis;
pub mod classifier;
pub mod error;
pub mod identifiers;
pub mod transcript;

pub use analysis::{
    AnalysisRecord, Classification, ClassificationDetails, Intent, Sentiment, SentimentHits,
};
pub use classifier::classify;
pub use error::StoreError;
pub use identifiers::{AnalysisId, CustomerId, IdValidationError, TranscriptId};
pub use transcript::{NewTranscript, Transcript, TranscriptSummary};
