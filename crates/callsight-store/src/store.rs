//! Transcript and analysis CRUD over the pooled SQLite backend.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, params};

use callsight_core::{
    AnalysisId, AnalysisRecord, Classification, CustomerId, Intent, NewTranscript, Sentiment,
    StoreError, Transcript, TranscriptId, TranscriptSummary,
};

use crate::migration::MigrationEngine;
use crate::pool::SqlitePool;

/// Persistence layer for call transcripts and analysis results.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct TranscriptStore {
    pool: Arc<SqlitePool>,
}

/// Raw row shapes read inside rusqlite closures, converted to domain
/// types (with validation) outside of them.
struct TranscriptRow {
    id: i64,
    customer_id: String,
    customer_name: String,
    text: String,
    call_date: String,
    duration_seconds: u32,
    phone_number: String,
}

struct AnalysisRow {
    id: i64,
    transcript_id: i64,
    customer_id: String,
    intent: String,
    sentiment: String,
    confidence_score: f64,
    analysis_date: String,
    raw_analysis: String,
}

impl TranscriptStore {
    /// Open (or create) the database at `path` and apply pending migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::with_pool_size(path, 4)
    }

    /// Open with a custom connection pool size.
    pub fn with_pool_size(path: impl AsRef<Path>, pool_size: usize) -> Result<Self, StoreError> {
        let pool = Arc::new(SqlitePool::new(path, pool_size)?);

        let conn = pool.acquire()?;
        MigrationEngine::new().migrate(&conn)?;
        drop(conn);

        Ok(Self { pool })
    }

    /// Store a new transcript and return its assigned id.
    pub fn create_transcript(&self, new: &NewTranscript) -> Result<TranscriptId, StoreError> {
        let conn = self.pool.acquire()?;

        conn.execute(
            "INSERT INTO call_transcripts
             (customer_id, customer_name, transcript, call_date, duration_seconds, phone_number)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new.customer_id.as_str(),
                new.customer_name,
                new.text,
                Utc::now().to_rfc3339(),
                new.duration_seconds,
                new.phone_number,
            ],
        )
        .map_err(query_failed)?;

        let id = TranscriptId::new(conn.last_insert_rowid());
        tracing::debug!(transcript_id = %id, customer_id = %new.customer_id, "Stored transcript");
        Ok(id)
    }

    /// Fetch a transcript by id.
    pub fn transcript(&self, id: TranscriptId) -> Result<Transcript, StoreError> {
        let conn = self.pool.acquire()?;

        let row = conn
            .query_row(
                "SELECT id, customer_id, customer_name, transcript,
                        call_date, duration_seconds, phone_number
                 FROM call_transcripts
                 WHERE id = ?1",
                params![id.as_i64()],
                transcript_row,
            )
            .optional()
            .map_err(query_failed)?
            .ok_or_else(|| StoreError::transcript_not_found(id))?;

        row.into_transcript()
    }

    /// List all stored transcripts, newest first, without the call text.
    pub fn list_transcripts(&self) -> Result<Vec<TranscriptSummary>, StoreError> {
        let conn = self.pool.acquire()?;

        let mut stmt = conn
            .prepare(
                "SELECT id, customer_id, customer_name, duration_seconds, call_date
                 FROM call_transcripts
                 ORDER BY call_date DESC, id DESC",
            )
            .map_err(query_failed)?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, u32>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .map_err(query_failed)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_failed)?;

        rows.into_iter()
            .map(|(id, customer_id, customer_name, duration_seconds, call_date)| {
                Ok(TranscriptSummary {
                    id: TranscriptId::new(id),
                    customer_id: CustomerId::new_unchecked(customer_id),
                    customer_name,
                    duration_seconds,
                    call_date: parse_timestamp("transcript", id, &call_date)?,
                })
            })
            .collect()
    }

    /// Fetch all transcripts for a customer, newest first.
    pub fn transcripts_for_customer(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<Transcript>, StoreError> {
        let conn = self.pool.acquire()?;

        let mut stmt = conn
            .prepare(
                "SELECT id, customer_id, customer_name, transcript,
                        call_date, duration_seconds, phone_number
                 FROM call_transcripts
                 WHERE customer_id = ?1
                 ORDER BY call_date DESC, id DESC",
            )
            .map_err(query_failed)?;

        let rows = stmt
            .query_map(params![customer_id.as_str()], transcript_row)
            .map_err(query_failed)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_failed)?;

        rows.into_iter().map(TranscriptRow::into_transcript).collect()
    }

    /// Persist a classification for an existing transcript.
    ///
    /// Fails with a not-found error if the transcript does not exist;
    /// analysis rows never reference missing transcripts.
    pub fn save_analysis(
        &self,
        transcript_id: TranscriptId,
        customer_id: &CustomerId,
        classification: &Classification,
    ) -> Result<AnalysisId, StoreError> {
        let conn = self.pool.acquire()?;

        let exists: Option<i64> = conn
            .query_row(
                "SELECT id FROM call_transcripts WHERE id = ?1",
                params![transcript_id.as_i64()],
                |row| row.get(0),
            )
            .optional()
            .map_err(query_failed)?;
        if exists.is_none() {
            return Err(StoreError::transcript_not_found(transcript_id));
        }

        let raw_analysis =
            serde_json::to_string(classification).map_err(|e| StoreError::QueryFailed {
                reason: format!("failed to serialize classification: {e}"),
            })?;

        conn.execute(
            "INSERT INTO analysis_results
             (transcript_id, customer_id, intent, sentiment, confidence_score,
              analysis_date, raw_analysis)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                transcript_id.as_i64(),
                customer_id.as_str(),
                classification.intent.as_str(),
                classification.sentiment.as_str(),
                classification.overall_confidence,
                Utc::now().to_rfc3339(),
                raw_analysis,
            ],
        )
        .map_err(query_failed)?;

        let id = AnalysisId::new(conn.last_insert_rowid());
        tracing::debug!(
            analysis_id = %id,
            transcript_id = %transcript_id,
            intent = %classification.intent,
            sentiment = %classification.sentiment,
            "Stored analysis result"
        );
        Ok(id)
    }

    /// Fetch a stored analysis result by id.
    pub fn analysis(&self, id: AnalysisId) -> Result<AnalysisRecord, StoreError> {
        let conn = self.pool.acquire()?;

        let row = conn
            .query_row(
                "SELECT id, transcript_id, customer_id, intent, sentiment,
                        confidence_score, analysis_date, raw_analysis
                 FROM analysis_results
                 WHERE id = ?1",
                params![id.as_i64()],
                analysis_row,
            )
            .optional()
            .map_err(query_failed)?
            .ok_or_else(|| StoreError::analysis_not_found(id))?;

        row.into_record()
    }

    /// Fetch all analysis results for a customer, newest first.
    pub fn analysis_history(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<AnalysisRecord>, StoreError> {
        let conn = self.pool.acquire()?;

        let mut stmt = conn
            .prepare(
                "SELECT id, transcript_id, customer_id, intent, sentiment,
                        confidence_score, analysis_date, raw_analysis
                 FROM analysis_results
                 WHERE customer_id = ?1
                 ORDER BY analysis_date DESC, id DESC",
            )
            .map_err(query_failed)?;

        let rows = stmt
            .query_map(params![customer_id.as_str()], analysis_row)
            .map_err(query_failed)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_failed)?;

        rows.into_iter().map(AnalysisRow::into_record).collect()
    }
}

fn query_failed(error: rusqlite::Error) -> StoreError {
    StoreError::QueryFailed {
        reason: error.to_string(),
    }
}

fn transcript_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TranscriptRow> {
    Ok(TranscriptRow {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        customer_name: row.get(2)?,
        text: row.get(3)?,
        call_date: row.get(4)?,
        duration_seconds: row.get(5)?,
        phone_number: row.get(6)?,
    })
}

fn analysis_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AnalysisRow> {
    Ok(AnalysisRow {
        id: row.get(0)?,
        transcript_id: row.get(1)?,
        customer_id: row.get(2)?,
        intent: row.get(3)?,
        sentiment: row.get(4)?,
        confidence_score: row.get(5)?,
        analysis_date: row.get(6)?,
        raw_analysis: row.get(7)?,
    })
}

fn parse_timestamp(entity: &'static str, id: i64, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::CorruptRecord {
            entity,
            id: id.to_string(),
            reason: format!("unparseable timestamp '{raw}': {e}"),
        })
}

impl TranscriptRow {
    fn into_transcript(self) -> Result<Transcript, StoreError> {
        Ok(Transcript {
            id: TranscriptId::new(self.id),
            customer_id: CustomerId::new_unchecked(self.customer_id),
            customer_name: self.customer_name,
            text: self.text,
            call_date: parse_timestamp("transcript", self.id, &self.call_date)?,
            duration_seconds: self.duration_seconds,
            phone_number: self.phone_number,
        })
    }
}

impl AnalysisRow {
    fn into_record(self) -> Result<AnalysisRecord, StoreError> {
        let corrupt = |reason: String| StoreError::CorruptRecord {
            entity: "analysis",
            id: self.id.to_string(),
            reason,
        };

        let intent = Intent::from_label(&self.intent)
            .ok_or_else(|| corrupt(format!("unknown intent label '{}'", self.intent)))?;
        let sentiment = Sentiment::from_label(&self.sentiment)
            .ok_or_else(|| corrupt(format!("unknown sentiment label '{}'", self.sentiment)))?;
        let raw_analysis = serde_json::from_str(&self.raw_analysis)
            .map_err(|e| corrupt(format!("unparseable raw analysis: {e}")))?;
        let analysis_date = parse_timestamp("analysis", self.id, &self.analysis_date)?;

        Ok(AnalysisRecord {
            id: AnalysisId::new(self.id),
            transcript_id: TranscriptId::new(self.transcript_id),
            customer_id: CustomerId::new_unchecked(self.customer_id),
            intent,
            sentiment,
            confidence_score: self.confidence_score,
            analysis_date,
            raw_analysis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callsight_core::classify;
    use tempfile::tempdir;

    fn sample(customer: &str, text: &str) -> NewTranscript {
        NewTranscript {
            customer_id: CustomerId::parse(customer).unwrap(),
            customer_name: "Test Customer".to_string(),
            text: text.to_string(),
            duration_seconds: 120,
            phone_number: "+1-555-0000".to_string(),
        }
    }

    fn open_store(dir: &tempfile::TempDir) -> TranscriptStore {
        TranscriptStore::open(dir.path().join("calls.db")).unwrap()
    }

    #[test]
    fn transcript_round_trip() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        let new = sample("CUST001", "I want to cancel my subscription");
        let id = store.create_transcript(&new).unwrap();

        let stored = store.transcript(id).unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.customer_id, new.customer_id);
        assert_eq!(stored.text, new.text);
        assert_eq!(stored.duration_seconds, 120);
    }

    #[test]
    fn missing_transcript_is_not_found() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        let err = store.transcript(TranscriptId::new(999)).unwrap_err();
        assert!(err.is_not_found(), "unexpected error: {err}");
    }

    #[test]
    fn listing_is_newest_first() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        let first = store.create_transcript(&sample("CUST001", "first call")).unwrap();
        let second = store.create_transcript(&sample("CUST002", "second call")).unwrap();

        let summaries = store.list_transcripts().unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, second);
        assert_eq!(summaries[1].id, first);
    }

    #[test]
    fn customer_lookup_filters_other_customers() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        store.create_transcript(&sample("CUST001", "call one")).unwrap();
        store.create_transcript(&sample("CUST002", "call two")).unwrap();
        store.create_transcript(&sample("CUST001", "call three")).unwrap();

        let customer = CustomerId::parse("CUST001").unwrap();
        let transcripts = store.transcripts_for_customer(&customer).unwrap();
        assert_eq!(transcripts.len(), 2);
        assert!(transcripts.iter().all(|t| t.customer_id == customer));
    }

    #[test]
    fn analysis_round_trip_preserves_engine_output() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        let new = sample("CUST003", "I can't log in, please reset my password, thank you");
        let transcript_id = store.create_transcript(&new).unwrap();

        let classification = classify(&new.text);
        let analysis_id = store
            .save_analysis(transcript_id, &new.customer_id, &classification)
            .unwrap();

        let record = store.analysis(analysis_id).unwrap();
        assert_eq!(record.transcript_id, transcript_id);
        assert_eq!(record.intent, classification.intent);
        assert_eq!(record.sentiment, classification.sentiment);
        assert_eq!(record.confidence_score, classification.overall_confidence);

        // The raw payload reproduces the classification exactly.
        let stored: Classification = serde_json::from_value(record.raw_analysis).unwrap();
        assert_eq!(stored, classification);
    }

    #[test]
    fn analysis_requires_existing_transcript() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        let classification = classify("hello");
        let customer = CustomerId::parse("CUST001").unwrap();
        let err = store
            .save_analysis(TranscriptId::new(42), &customer, &classification)
            .unwrap_err();
        assert!(err.is_not_found(), "unexpected error: {err}");
    }

    #[test]
    fn reanalysis_appends_rows() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        let new = sample("CUST004", "there is a problem with my invoice");
        let transcript_id = store.create_transcript(&new).unwrap();
        let classification = classify(&new.text);

        let first = store
            .save_analysis(transcript_id, &new.customer_id, &classification)
            .unwrap();
        let second = store
            .save_analysis(transcript_id, &new.customer_id, &classification)
            .unwrap();
        assert_ne!(first, second);

        let history = store.analysis_history(&new.customer_id).unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|r| r.transcript_id == transcript_id));
    }

    #[test]
    fn missing_analysis_is_not_found() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        let err = store.analysis(AnalysisId::new(7)).unwrap_err();
        assert!(err.is_not_found(), "unexpected error: {err}");
    }
}
