//! Classification output and stored analysis records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::identifiers::{AnalysisId, CustomerId, TranscriptId};

/// Intent categories in fixed priority order.
///
/// The declaration order is the tie-break order: when two categories match
/// the same number of keywords, the earlier variant wins. `None` is the
/// sentinel for a transcript that matched no intent keyword at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Complaint,
    Cancellation,
    Billing,
    Upgrade,
    AccountAccess,
    Support,
    ComplaintResolution,
    None,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Complaint => "complaint",
            Intent::Cancellation => "cancellation",
            Intent::Billing => "billing",
            Intent::Upgrade => "upgrade",
            Intent::AccountAccess => "account_access",
            Intent::Support => "support",
            Intent::ComplaintResolution => "complaint_resolution",
            Intent::None => "none",
        }
    }

    /// Parse a stored intent label back into the enum.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "complaint" => Some(Intent::Complaint),
            "cancellation" => Some(Intent::Cancellation),
            "billing" => Some(Intent::Billing),
            "upgrade" => Some(Intent::Upgrade),
            "account_access" => Some(Intent::AccountAccess),
            "support" => Some(Intent::Support),
            "complaint_resolution" => Some(Intent::ComplaintResolution),
            "none" => Some(Intent::None),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentiment labels.
///
/// Declaration order is the tie-break order on equal hit counts:
/// positive > negative > neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    /// Parse a stored sentiment label back into the enum.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "positive" => Some(Sentiment::Positive),
            "negative" => Some(Sentiment::Negative),
            "neutral" => Some(Sentiment::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-sentiment keyword hit counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentHits {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentHits {
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

/// Supporting evidence attached to a classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationDetails {
    /// Keywords of the winning intent category that occurred in the text.
    pub matched_keywords: Vec<String>,
    /// Hit counts for every intent category that matched at least once.
    pub intent_hits: BTreeMap<String, usize>,
    pub sentiment_hits: SentimentHits,
}

/// Output of one classifier run over a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: Intent,
    pub intent_confidence: f64,
    pub sentiment: Sentiment,
    pub sentiment_confidence: f64,
    /// Arithmetic mean of the intent and sentiment confidences.
    pub overall_confidence: f64,
    pub details: ClassificationDetails,
}

/// A stored analysis result. Append-only: re-analysis inserts a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: AnalysisId,
    pub transcript_id: TranscriptId,
    pub customer_id: CustomerId,
    pub intent: Intent,
    pub sentiment: Sentiment,
    pub confidence_score: f64,
    pub analysis_date: DateTime<Utc>,
    /// Full classification as produced at analysis time.
    pub raw_analysis: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_labels_round_trip() {
        for intent in [
            Intent::Complaint,
            Intent::Cancellation,
            Intent::Billing,
            Intent::Upgrade,
            Intent::AccountAccess,
            Intent::Support,
            Intent::ComplaintResolution,
            Intent::None,
        ] {
            assert_eq!(Intent::from_label(intent.as_str()), Some(intent));
        }
        assert_eq!(Intent::from_label("escalation"), None);
    }

    #[test]
    fn sentiment_labels_round_trip() {
        for sentiment in [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral] {
            assert_eq!(Sentiment::from_label(sentiment.as_str()), Some(sentiment));
        }
    }

    #[test]
    fn serde_uses_snake_case_labels() {
        assert_eq!(
            serde_json::to_string(&Intent::AccountAccess).unwrap(),
            "\"account_access\""
        );
        assert_eq!(
            serde_json::to_string(&Sentiment::Neutral).unwrap(),
            "\"neutral\""
        );
    }
}
