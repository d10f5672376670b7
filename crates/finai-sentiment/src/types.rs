use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SentimentError;

/// Canonical three-class sentiment label.
///
/// Declaration order is the tie-break preference: when two labels score the
/// same, the earlier one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// All labels in tie-break preference order.
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = SentimentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            other => Err(SentimentError::InvalidInput(format!(
                "unknown sentiment label '{other}'"
            ))),
        }
    }
}

/// The four model adapters the ensemble knows how to weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Black-box financial-domain classifier.
    #[serde(rename = "finbert")]
    FinancialClassifier,
    /// Generic polarity lexicon (compound score).
    #[serde(rename = "vader")]
    GeneralLexicon,
    /// Black-box general-domain classifier.
    #[serde(rename = "general")]
    GeneralClassifier,
    /// Domain keyword counting.
    #[serde(rename = "rule_based")]
    LexiconRule,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::FinancialClassifier,
        ModelKind::GeneralLexicon,
        ModelKind::GeneralClassifier,
        ModelKind::LexiconRule,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ModelKind::FinancialClassifier => "finbert",
            ModelKind::GeneralLexicon => "vader",
            ModelKind::GeneralClassifier => "general",
            ModelKind::LexiconRule => "rule_based",
        }
    }

    /// Ensemble weight before renormalization.
    #[must_use]
    pub fn weight(self) -> f64 {
        match self {
            ModelKind::FinancialClassifier => 0.40,
            ModelKind::GeneralLexicon => 0.25,
            ModelKind::GeneralClassifier => 0.20,
            ModelKind::LexiconRule => 0.15,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which adapters a request runs.
///
/// `Ensemble` runs all of them; a single-model selector runs that model and
/// the rule-based adapter, which always runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSelector {
    #[default]
    Ensemble,
    Vader,
    Finbert,
    General,
}

impl ModelSelector {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ModelSelector::Ensemble => "ensemble",
            ModelSelector::Vader => "vader",
            ModelSelector::Finbert => "finbert",
            ModelSelector::General => "general",
        }
    }

    #[must_use]
    pub fn includes(self, kind: ModelKind) -> bool {
        match (self, kind) {
            (ModelSelector::Ensemble, _)
            | (_, ModelKind::LexiconRule)
            | (ModelSelector::Vader, ModelKind::GeneralLexicon)
            | (ModelSelector::Finbert, ModelKind::FinancialClassifier)
            | (ModelSelector::General, ModelKind::GeneralClassifier) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ModelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelSelector {
    type Err = SentimentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ensemble" => Ok(ModelSelector::Ensemble),
            "vader" => Ok(ModelSelector::Vader),
            "finbert" => Ok(ModelSelector::Finbert),
            "general" => Ok(ModelSelector::General),
            other => Err(SentimentError::InvalidInput(format!(
                "unknown model type '{other}'"
            ))),
        }
    }
}

/// One adapter's verdict over a chunk or a whole text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    pub label: SentimentLabel,
    /// Always in `[0, 1]`.
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default = "one")]
    pub chunks_analyzed: usize,
}

fn one() -> usize {
    1
}

impl ModelResult {
    /// Build a result, clamping `confidence` into `[0, 1]`. NaN becomes `0`.
    #[must_use]
    pub fn new(label: SentimentLabel, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            label,
            confidence,
            error: None,
            chunks_analyzed: 1,
        }
    }

    /// The `{neutral, 0.5, error}` result reported for a failed adapter.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            label: SentimentLabel::Neutral,
            confidence: 0.5,
            error: Some(error.into()),
            chunks_analyzed: 0,
        }
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Character span `[start, end)` of an entity in the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub span: Span,
    /// `1.0` when the extractor does not report a score. Not a calibrated
    /// probability; do not rank on it.
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictMetadata {
    pub text_length: usize,
    pub processed_length: usize,
    pub chunk_count: usize,
    /// Chunks holding a single sentence longer than the chunk limit; adapters
    /// may truncate these.
    pub oversized_chunks: usize,
    pub model_selector: ModelSelector,
    pub analyzed_at: DateTime<Utc>,
}

/// Combined sentiment for one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentVerdict {
    pub label: SentimentLabel,
    /// Always in `[0, 1]`.
    pub confidence: f64,
    /// Weighted score per label, divided by `total_weight`.
    pub scores: BTreeMap<SentimentLabel, f64>,
    /// Every adapter that ran, including failed ones (with `error` set).
    pub per_model: BTreeMap<String, ModelResult>,
    /// Adapters that contributed weight.
    pub models_used: Vec<String>,
    pub total_weight: f64,
    /// `true` when every adapter failed and the verdict is the `{neutral, 0.5}`
    /// placeholder.
    pub no_model_succeeded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<BTreeMap<String, Vec<Entity>>>,
    /// Set only on batch placeholders for texts that could not be analyzed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub metadata: VerdictMetadata,
}

impl finai_cache::Cacheable for SentimentVerdict {
    const KIND: &'static str = "sentiment_verdict";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_serializes_lowercase() {
        let json = serde_json::to_string(&SentimentLabel::Positive).unwrap();
        assert_eq!(json, "\"positive\"");
    }

    #[test]
    fn label_parses_case_insensitively() {
        assert_eq!(
            "NEGATIVE".parse::<SentimentLabel>().unwrap(),
            SentimentLabel::Negative
        );
        assert!("bullish".parse::<SentimentLabel>().is_err());
    }

    #[test]
    fn preference_order_is_positive_negative_neutral() {
        assert!(SentimentLabel::Positive < SentimentLabel::Negative);
        assert!(SentimentLabel::Negative < SentimentLabel::Neutral);
    }

    #[test]
    fn weights_sum_to_one() {
        let total: f64 = ModelKind::ALL.iter().map(|k| k.weight()).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_model_selector_keeps_rule_based() {
        assert!(ModelSelector::Vader.includes(ModelKind::GeneralLexicon));
        assert!(ModelSelector::Vader.includes(ModelKind::LexiconRule));
        assert!(!ModelSelector::Vader.includes(ModelKind::FinancialClassifier));
        assert!(!ModelSelector::Vader.includes(ModelKind::GeneralClassifier));
    }

    #[test]
    fn ensemble_selector_includes_every_model() {
        assert!(ModelKind::ALL
            .iter()
            .all(|k| ModelSelector::Ensemble.includes(*k)));
    }

    #[test]
    fn model_kind_serializes_with_wire_names() {
        assert_eq!(
            serde_json::to_string(&ModelKind::FinancialClassifier).unwrap(),
            "\"finbert\""
        );
        assert_eq!(
            serde_json::to_string(&ModelKind::LexiconRule).unwrap(),
            "\"rule_based\""
        );
    }

    #[test]
    fn model_result_clamps_confidence() {
        assert_eq!(ModelResult::new(SentimentLabel::Positive, 1.7).confidence, 1.0);
        assert_eq!(ModelResult::new(SentimentLabel::Positive, -0.2).confidence, 0.0);
        assert_eq!(
            ModelResult::new(SentimentLabel::Positive, f64::NAN).confidence,
            0.0
        );
    }

    #[test]
    fn failed_result_is_neutral_half() {
        let result = ModelResult::failed("boom");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.confidence, 0.5);
        assert!(!result.succeeded());
    }
}
