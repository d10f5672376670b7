//! General-purpose polarity lexicon adapter (VADER compound score).

use async_trait::async_trait;
use vader_sentiment::SentimentIntensityAnalyzer;

use crate::error::SentimentError;
use crate::models::SentimentModel;
use crate::types::{ModelKind, ModelResult, SentimentLabel};

const POSITIVE_THRESHOLD: f64 = 0.05;
const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Map a compound score in `[-1, 1]` to a label; confidence is `|compound|`.
#[must_use]
pub(crate) fn label_compound(compound: f64) -> ModelResult {
    let label = if compound >= POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if compound <= NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };
    ModelResult::new(label, compound.abs())
}

pub struct VaderModel {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderModel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Compound polarity score for `text`, `0.0` for blank input.
    #[must_use]
    pub fn compound(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        let scores = self.analyzer.polarity_scores(text);
        scores.get("compound").copied().unwrap_or(0.0)
    }
}

impl Default for VaderModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SentimentModel for VaderModel {
    fn kind(&self) -> ModelKind {
        ModelKind::GeneralLexicon
    }

    async fn classify(&self, chunk: &str) -> Result<ModelResult, SentimentError> {
        Ok(label_compound(self.compound(chunk)))
    }
}
