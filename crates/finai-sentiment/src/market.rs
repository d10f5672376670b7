//! Market-wide sentiment from the stored labels of recent news.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::SentimentLabel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSentimentSummary {
    pub overall_sentiment: SentimentLabel,
    /// Share of articles carrying the majority label.
    pub confidence: f64,
    /// Percentage of articles per label, `0..=100`.
    pub breakdown: BTreeMap<SentimentLabel, f64>,
    pub articles_analyzed: usize,
}

/// Majority vote over article labels. Unrecognized labels are ignored; ties
/// follow the usual positive, negative, neutral preference.
#[must_use]
pub fn summarize_market_sentiment<'a, I>(labels: I) -> MarketSentimentSummary
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<SentimentLabel, usize> =
        SentimentLabel::ALL.iter().map(|l| (*l, 0)).collect();
    let mut total = 0_usize;
    for label in labels {
        if let Ok(label) = label.parse::<SentimentLabel>() {
            *counts.entry(label).or_insert(0) += 1;
            total += 1;
        }
    }

    if total == 0 {
        return MarketSentimentSummary {
            overall_sentiment: SentimentLabel::Neutral,
            confidence: 0.5,
            breakdown: SentimentLabel::ALL.iter().map(|l| (*l, 0.0)).collect(),
            articles_analyzed: 0,
        };
    }

    let mut overall = SentimentLabel::Positive;
    for label in SentimentLabel::ALL {
        if counts[&label] > counts[&overall] {
            overall = label;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let share = |n: usize| n as f64 / total as f64;
    MarketSentimentSummary {
        overall_sentiment: overall,
        confidence: share(counts[&overall]),
        breakdown: counts.iter().map(|(l, n)| (*l, share(*n) * 100.0)).collect(),
        articles_analyzed: total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_articles_is_neutral_half() {
        let summary = summarize_market_sentiment(std::iter::empty());
        assert_eq!(summary.overall_sentiment, SentimentLabel::Neutral);
        assert_eq!(summary.confidence, 0.5);
        assert_eq!(summary.articles_analyzed, 0);
    }

    #[test]
    fn majority_label_wins_with_its_share() {
        let summary =
            summarize_market_sentiment(["negative", "negative", "positive", "neutral"]);
        assert_eq!(summary.overall_sentiment, SentimentLabel::Negative);
        assert!((summary.confidence - 0.5).abs() < 1e-12);
        assert!((summary.breakdown[&SentimentLabel::Positive] - 25.0).abs() < 1e-9);
        assert_eq!(summary.articles_analyzed, 4);
    }

    #[test]
    fn unknown_labels_are_skipped() {
        let summary = summarize_market_sentiment(["mixed", "positive"]);
        assert_eq!(summary.articles_analyzed, 1);
        assert_eq!(summary.overall_sentiment, SentimentLabel::Positive);
        assert_eq!(summary.confidence, 1.0);
    }

    #[test]
    fn ties_prefer_positive() {
        let summary = summarize_market_sentiment(["neutral", "positive"]);
        assert_eq!(summary.overall_sentiment, SentimentLabel::Positive);
    }
}
