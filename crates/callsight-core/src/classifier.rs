//! Keyword-frequency classifier for call transcripts.
//!
//! The engine is a pure function: it lower-cases the input once, counts
//! case-insensitive substring matches against fixed keyword tables, and
//! derives (intent, sentiment, confidence) from the hit counts. Each keyword
//! counts once per transcript regardless of how often it occurs.
//!
//! Confidence constants, kept stable across the whole system:
//! - intent confidence = matched keywords / `INTENT_NORMALIZER`, capped at 1.0
//! - sentiment confidence = winning hit count / total hit count
//! - no sentiment signal at all defaults to neutral with confidence 1.0

use std::collections::BTreeMap;

use crate::analysis::{Classification, ClassificationDetails, Intent, Sentiment, SentimentHits};

/// Ceiling for intent keyword matches; five matched keywords saturate
/// intent confidence at 1.0.
const INTENT_NORMALIZER: f64 = 5.0;

/// Intent keyword tables in priority order. On equal match counts the
/// earlier entry wins.
const INTENT_TABLE: &[(Intent, &[&str])] = &[
    (
        Intent::Complaint,
        &[
            "damaged",
            "broken",
            "issue",
            "problem",
            "wrong",
            "defective",
            "not working",
        ],
    ),
    (
        Intent::Cancellation,
        &["cancel", "terminate", "stop", "close account", "quit"],
    ),
    (
        Intent::Billing,
        &[
            "charge",
            "billing",
            "refund",
            "payment",
            "invoice",
            "duplicate",
            "expensive",
        ],
    ),
    (
        Intent::Upgrade,
        &["upgrade", "premium", "increase", "add", "more features"],
    ),
    (
        Intent::AccountAccess,
        &["login", "password", "reset", "access", "lock", "forgot"],
    ),
    (
        Intent::Support,
        &["help", "question", "howto", "how do i", "can you"],
    ),
    (
        Intent::ComplaintResolution,
        &["sorry", "apologize", "make it right", "compensation"],
    ),
];

/// Sentiment keyword tables. Declaration order doubles as the tie-break
/// order: positive > negative > neutral.
const SENTIMENT_TABLE: &[(Sentiment, &[&str])] = &[
    (
        Sentiment::Positive,
        &[
            "thank",
            "appreciate",
            "great",
            "perfect",
            "love",
            "excellent",
            "satisfied",
            "happy",
        ],
    ),
    (
        Sentiment::Negative,
        &[
            "frustrated",
            "angry",
            "upset",
            "furious",
            "terrible",
            "horrible",
            "unacceptable",
            "annoyed",
        ],
    ),
    (
        Sentiment::Neutral,
        &["okay", "fine", "alright", "sure", "understand"],
    ),
];

/// Classify a transcript into intent, sentiment, and confidence scores.
///
/// Total over all string input: empty or whitespace-only text yields the
/// degenerate-but-valid result (intent `none` at 0.0, sentiment neutral at
/// 1.0) rather than an error.
pub fn classify(text: &str) -> Classification {
    let lowered = text.to_lowercase();

    let (intent, intent_confidence, matched_keywords, intent_hits) = extract_intent(&lowered);
    let (sentiment, sentiment_confidence, sentiment_hits) = extract_sentiment(&lowered);

    Classification {
        intent,
        intent_confidence,
        sentiment,
        sentiment_confidence,
        overall_confidence: (intent_confidence + sentiment_confidence) / 2.0,
        details: ClassificationDetails {
            matched_keywords,
            intent_hits,
            sentiment_hits,
        },
    }
}

fn extract_intent(lowered: &str) -> (Intent, f64, Vec<String>, BTreeMap<String, usize>) {
    let mut best: Option<(Intent, Vec<String>)> = None;
    let mut hits = BTreeMap::new();

    for (intent, keywords) in INTENT_TABLE {
        let matched: Vec<String> = keywords
            .iter()
            .filter(|keyword| lowered.contains(*keyword))
            .map(|keyword| keyword.to_string())
            .collect();

        if matched.is_empty() {
            continue;
        }

        hits.insert(intent.as_str().to_string(), matched.len());

        // Strict comparison keeps the earliest category on ties.
        let is_better = best
            .as_ref()
            .is_none_or(|(_, best_matched)| matched.len() > best_matched.len());
        if is_better {
            best = Some((*intent, matched));
        }
    }

    match best {
        Some((intent, matched)) => {
            let confidence = (matched.len() as f64 / INTENT_NORMALIZER).min(1.0);
            (intent, confidence, matched, hits)
        }
        None => (Intent::None, 0.0, Vec::new(), hits),
    }
}

fn extract_sentiment(lowered: &str) -> (Sentiment, f64, SentimentHits) {
    let mut hits = SentimentHits::default();
    let mut best: Option<(Sentiment, usize)> = None;

    for (sentiment, keywords) in SENTIMENT_TABLE {
        let count = keywords
            .iter()
            .filter(|keyword| lowered.contains(*keyword))
            .count();

        match sentiment {
            Sentiment::Positive => hits.positive = count,
            Sentiment::Negative => hits.negative = count,
            Sentiment::Neutral => hits.neutral = count,
        }

        let is_better = best.as_ref().is_none_or(|(_, best_count)| count > *best_count);
        if is_better {
            best = Some((*sentiment, count));
        }
    }

    let total = hits.total();
    if total == 0 {
        // Uncontested default: nothing suggested otherwise.
        return (Sentiment::Neutral, 1.0, hits);
    }

    let (sentiment, count) = best.unwrap_or((Sentiment::Neutral, 0));
    (sentiment, count as f64 / total as f64, hits)
}
