//! Chunk-level and model-level vote aggregation.

use std::collections::BTreeMap;

use crate::types::{ModelKind, ModelResult, SentimentLabel};

/// Pick the highest-scoring label; exact ties go to the earlier label in
/// [`SentimentLabel::ALL`].
fn argmax(scores: &BTreeMap<SentimentLabel, f64>) -> (SentimentLabel, f64) {
    let mut best = (SentimentLabel::Neutral, f64::NEG_INFINITY);
    for label in SentimentLabel::ALL {
        let score = scores.get(&label).copied().unwrap_or(0.0);
        if score > best.1 {
            best = (label, score);
        }
    }
    best
}

fn zeroed() -> BTreeMap<SentimentLabel, f64> {
    SentimentLabel::ALL.iter().map(|l| (*l, 0.0)).collect()
}

/// Fold one adapter's per-chunk results into a single result.
///
/// Confidence is accumulated per label; the winner's accumulated confidence
/// divided by the chunk count is the adapter's confidence. An empty slice
/// yields `{neutral, 0.5}` with zero chunks analyzed.
#[must_use]
pub fn aggregate_chunks(chunks: &[ModelResult]) -> ModelResult {
    if chunks.is_empty() {
        let mut result = ModelResult::new(SentimentLabel::Neutral, 0.5);
        result.chunks_analyzed = 0;
        return result;
    }

    let mut totals = zeroed();
    for chunk in chunks {
        *totals.entry(chunk.label).or_insert(0.0) += chunk.confidence;
    }
    let (label, sum) = argmax(&totals);

    #[allow(clippy::cast_precision_loss)]
    let mut result = ModelResult::new(label, sum / chunks.len() as f64);
    result.chunks_analyzed = chunks.len();
    result
}

/// Weighted vote over the adapters that succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    pub label: SentimentLabel,
    pub confidence: f64,
    /// `sum(weight * confidence)` per label, before division.
    pub raw_scores: BTreeMap<SentimentLabel, f64>,
    /// `raw_scores / total_weight`.
    pub scores: BTreeMap<SentimentLabel, f64>,
    pub total_weight: f64,
    pub models_used: Vec<String>,
}

impl Combination {
    #[must_use]
    pub fn no_model_succeeded(&self) -> bool {
        self.models_used.is_empty()
    }
}

/// Combine per-adapter results with their fixed weights, renormalized over
/// the adapters without an error. With nothing usable the result is
/// `{neutral, 0.5}` and [`Combination::no_model_succeeded`] is `true`.
#[must_use]
pub fn combine(results: &[(ModelKind, ModelResult)]) -> Combination {
    let mut raw_scores = zeroed();
    let mut total_weight = 0.0;
    let mut models_used = Vec::new();

    for (kind, result) in results {
        if !result.succeeded() {
            continue;
        }
        let weight = kind.weight();
        *raw_scores.entry(result.label).or_insert(0.0) += weight * result.confidence;
        total_weight += weight;
        models_used.push(kind.name().to_owned());
    }

    if models_used.is_empty() {
        return Combination {
            label: SentimentLabel::Neutral,
            confidence: 0.5,
            scores: zeroed(),
            raw_scores,
            total_weight: 0.0,
            models_used,
        };
    }

    let scores: BTreeMap<_, _> = raw_scores
        .iter()
        .map(|(label, score)| (*label, score / total_weight))
        .collect();
    let (label, confidence) = argmax(&scores);

    Combination {
        label,
        confidence: confidence.clamp(0.0, 1.0),
        raw_scores,
        scores,
        total_weight,
        models_used,
    }
}
