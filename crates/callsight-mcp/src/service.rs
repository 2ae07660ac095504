//! Analyze-and-store pipeline shared by the MCP tools and the CLI.

use serde::{Deserialize, Serialize};

use callsight_core::{
    AnalysisId, Classification, CustomerId, Intent, Sentiment, StoreError, TranscriptId, classify,
};
use callsight_store::TranscriptStore;

/// Runs the classification engine against stored transcripts and persists
/// the results. Cheap to clone; clones share the store's connection pool.
#[derive(Clone)]
pub struct AnalysisService {
    store: TranscriptStore,
}

/// Result of analyzing one transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub analysis_id: AnalysisId,
    pub transcript_id: TranscriptId,
    pub customer_id: CustomerId,
    pub analysis: Classification,
}

/// One entry of a batch analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    pub transcript_id: TranscriptId,
    pub analysis_id: AnalysisId,
    pub intent: Intent,
    pub sentiment: Sentiment,
    pub confidence: f64,
}

/// Result of analyzing every transcript of a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub customer_id: CustomerId,
    pub transcripts_analyzed: usize,
    pub analyses: Vec<BatchItem>,
}

impl AnalysisService {
    pub fn new(store: TranscriptStore) -> Self {
        Self { store }
    }

    /// The underlying transcript store.
    pub fn store(&self) -> &TranscriptStore {
        &self.store
    }

    /// Fetch a transcript, classify it, and persist the result.
    pub fn analyze(&self, transcript_id: TranscriptId) -> Result<AnalysisOutcome, StoreError> {
        let transcript = self.store.transcript(transcript_id)?;
        let analysis = classify(&transcript.text);
        let analysis_id =
            self.store
                .save_analysis(transcript_id, &transcript.customer_id, &analysis)?;

        tracing::info!(
            transcript_id = %transcript_id,
            analysis_id = %analysis_id,
            intent = %analysis.intent,
            sentiment = %analysis.sentiment,
            confidence = analysis.overall_confidence,
            "Analyzed transcript"
        );

        Ok(AnalysisOutcome {
            analysis_id,
            transcript_id,
            customer_id: transcript.customer_id,
            analysis,
        })
    }

    /// Analyze every stored transcript of a customer.
    ///
    /// A customer with no transcripts yields an empty batch rather than an
    /// error; unknown customers are indistinguishable from customers without
    /// calls.
    pub fn batch_analyze(&self, customer_id: &CustomerId) -> Result<BatchOutcome, StoreError> {
        let transcripts = self.store.transcripts_for_customer(customer_id)?;

        let mut analyses = Vec::with_capacity(transcripts.len());
        for transcript in &transcripts {
            let outcome = self.analyze(transcript.id)?;
            analyses.push(BatchItem {
                transcript_id: outcome.transcript_id,
                analysis_id: outcome.analysis_id,
                intent: outcome.analysis.intent,
                sentiment: outcome.analysis.sentiment,
                confidence: outcome.analysis.overall_confidence,
            });
        }

        Ok(BatchOutcome {
            customer_id: customer_id.clone(),
            transcripts_analyzed: analyses.len(),
            analyses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callsight_core::NewTranscript;
    use tempfile::tempdir;

    fn service_with_transcripts(dir: &tempfile::TempDir) -> (AnalysisService, Vec<TranscriptId>) {
        let store = TranscriptStore::open(dir.path().join("service.db")).unwrap();
        let customer = CustomerId::parse("CUST001").unwrap();

        let texts = [
            "I want to cancel my subscription, it is too expensive",
            "Thank you so much, the upgrade to premium was perfect",
        ];

        let ids = texts
            .iter()
            .map(|text| {
                store
                    .create_transcript(&NewTranscript {
                        customer_id: customer.clone(),
                        customer_name: "Jane Doe".to_string(),
                        text: text.to_string(),
                        duration_seconds: 90,
                        phone_number: "+1-555-0100".to_string(),
                    })
                    .unwrap()
            })
            .collect();

        (AnalysisService::new(store), ids)
    }

    #[test]
    fn analyze_persists_and_returns_classification() {
        let dir = tempdir().unwrap();
        let (service, ids) = service_with_transcripts(&dir);

        let outcome = service.analyze(ids[0]).unwrap();
        assert_eq!(outcome.analysis.intent, Intent::Cancellation);

        let stored = service.store().analysis(outcome.analysis_id).unwrap();
        assert_eq!(stored.intent, outcome.analysis.intent);
        assert_eq!(stored.sentiment, outcome.analysis.sentiment);
        assert_eq!(stored.confidence_score, outcome.analysis.overall_confidence);
    }

    #[test]
    fn analyze_unknown_transcript_fails_with_not_found() {
        let dir = tempdir().unwrap();
        let (service, _) = service_with_transcripts(&dir);

        let err = service.analyze(TranscriptId::new(999)).unwrap_err();
        assert!(err.is_not_found(), "unexpected error: {err}");
    }

    #[test]
    fn batch_analyze_covers_every_customer_transcript() {
        let dir = tempdir().unwrap();
        let (service, ids) = service_with_transcripts(&dir);
        let customer = CustomerId::parse("CUST001").unwrap();

        let batch = service.batch_analyze(&customer).unwrap();
        assert_eq!(batch.transcripts_analyzed, 2);

        let analyzed: Vec<_> = batch.analyses.iter().map(|a| a.transcript_id).collect();
        for id in ids {
            assert!(analyzed.contains(&id));
        }

        let history = service.store().analysis_history(&customer).unwrap();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn batch_analyze_of_unknown_customer_is_empty() {
        let dir = tempdir().unwrap();
        let (service, _) = service_with_transcripts(&dir);

        let customer = CustomerId::parse("CUST999").unwrap();
        let batch = service.batch_analyze(&customer).unwrap();
        assert_eq!(batch.transcripts_analyzed, 0);
        assert!(batch.analyses.is_empty());
    }
}
