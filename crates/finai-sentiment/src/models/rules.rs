//! Financial keyword counting adapter.

use async_trait::async_trait;

use crate::error::SentimentError;
use crate::models::SentimentModel;
use crate::types::{ModelKind, ModelResult, SentimentLabel};

/// Lowercase single words. Common inflections are listed explicitly so
/// headline phrasing ("surged", "beats") still matches.
pub(crate) const POSITIVE_KEYWORDS: &[&str] = &[
    "profit", "profits", "gain", "gains", "gained", "growth", "bull", "rise", "rises", "rising",
    "rose", "increase", "increased", "positive", "strong", "stronger", "beat", "beats",
    "exceed", "exceeded", "exceeds", "outperform", "outperformed", "surge", "surged", "surges",
    "rally", "rallied", "boom", "bullish", "uptrend", "breakthrough", "milestone",
    "achievement",
];

pub(crate) const NEGATIVE_KEYWORDS: &[&str] = &[
    "loss", "losses", "decline", "declined", "declines", "bear", "fall", "fell", "falls",
    "decrease", "decreased", "negative", "weak", "weaker", "miss", "missed", "misses",
    "underperform", "underperformed", "crash", "crashed", "plunge", "plunged", "recession",
    "bearish", "downtrend", "crisis", "risk", "risks", "concern", "concerns", "worry",
    "worries", "trouble",
];

pub(crate) const NEUTRAL_KEYWORDS: &[&str] = &[
    "stable", "unchanged", "flat", "sideways", "consolidate", "consolidated", "range",
    "maintain", "maintained", "steady", "consistent", "regular", "normal",
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeywordCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl KeywordCounts {
    fn total(self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

pub(crate) fn count_keywords(text: &str) -> KeywordCounts {
    let mut counts = KeywordCounts::default();
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        if POSITIVE_KEYWORDS.contains(&w.as_str()) {
            counts.positive += 1;
        } else if NEGATIVE_KEYWORDS.contains(&w.as_str()) {
            counts.negative += 1;
        } else if NEUTRAL_KEYWORDS.contains(&w.as_str()) {
            counts.neutral += 1;
        }
    }
    counts
}

/// Classify by the share of positive, negative and neutral keywords.
///
/// A strict majority share wins. Anything else (a tie, or neutral leading)
/// is neutral with confidence `max(neutral_share, 0.5)`. No keywords at all
/// yields `{neutral, 0.5}`.
#[must_use]
pub(crate) fn classify_by_keywords(text: &str) -> ModelResult {
    let counts = count_keywords(text);
    let total = counts.total();
    if total == 0 {
        return ModelResult::new(SentimentLabel::Neutral, 0.5);
    }

    #[allow(clippy::cast_precision_loss)]
    let share = |n: usize| n as f64 / total as f64;
    let (pos, neg, neu) = (
        share(counts.positive),
        share(counts.negative),
        share(counts.neutral),
    );

    if pos > neg && pos > neu {
        ModelResult::new(SentimentLabel::Positive, pos)
    } else if neg > pos && neg > neu {
        ModelResult::new(SentimentLabel::Negative, neg)
    } else {
        ModelResult::new(SentimentLabel::Neutral, neu.max(0.5))
    }
}

/// In-process adapter; never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedModel;

impl RuleBasedModel {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SentimentModel for RuleBasedModel {
    fn kind(&self) -> ModelKind {
        ModelKind::LexiconRule
    }

    async fn classify(&self, chunk: &str) -> Result<ModelResult, SentimentError> {
        Ok(classify_by_keywords(chunk))
    }
}
