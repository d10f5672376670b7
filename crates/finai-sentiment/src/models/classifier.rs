//! HTTP adapter for black-box text classification backends.
//!
//! Speaks the common inference-server shape: `POST {"inputs": "..."}`
//! answered by `[{"label", "score"}]` or `[[{"label", "score"}]]`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SentimentError;
use crate::models::SentimentModel;
use crate::retry::retry_with_backoff;
use crate::types::{ModelKind, ModelResult, SentimentLabel};

const BACKOFF_BASE_MS: u64 = 100;

/// Native label vocabulary of a classifier, mapped onto the canonical set.
///
/// Lookup is case-insensitive.
#[derive(Debug, Clone)]
pub struct LabelMap {
    entries: HashMap<String, SentimentLabel>,
}

impl LabelMap {
    pub fn new<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, SentimentLabel)>,
        S: AsRef<str>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v))
                .collect(),
        }
    }

    /// Financial-domain models emit the canonical names in any case.
    #[must_use]
    pub fn financial() -> Self {
        Self::new([
            ("positive", SentimentLabel::Positive),
            ("negative", SentimentLabel::Negative),
            ("neutral", SentimentLabel::Neutral),
        ])
    }

    /// Three-class general models emit positional `LABEL_n` names.
    #[must_use]
    pub fn general() -> Self {
        Self::new([
            ("label_0", SentimentLabel::Negative),
            ("label_1", SentimentLabel::Neutral),
            ("label_2", SentimentLabel::Positive),
            ("negative", SentimentLabel::Negative),
            ("neutral", SentimentLabel::Neutral),
            ("positive", SentimentLabel::Positive),
        ])
    }

    #[must_use]
    pub fn map(&self, native: &str) -> Option<SentimentLabel> {
        self.entries.get(&native.trim().to_ascii_lowercase()).copied()
    }
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassifyResponse {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            ClassifyResponse::Nested(outer) => outer.into_iter().next().unwrap_or_default(),
            ClassifyResponse::Flat(scores) => scores,
        }
    }
}

/// Remote classifier adapter. The top-scoring label is the verdict.
pub struct HttpClassifier {
    client: reqwest::Client,
    url: String,
    kind: ModelKind,
    labels: LabelMap,
    max_retries: u32,
}

impl HttpClassifier {
    /// Create a classifier for `url`.
    ///
    /// `request_timeout` bounds each HTTP attempt; the engine's per-adapter
    /// timeout bounds the adapter as a whole.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built.
    pub fn new(
        url: &str,
        kind: ModelKind,
        labels: LabelMap,
        request_timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, SentimentError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.to_owned(),
            kind,
            labels,
            max_retries,
        })
    }

    async fn request(&self, chunk: &str) -> Result<Vec<LabelScore>, SentimentError> {
        let response = self
            .client
            .post(&self.url)
            .json(&ClassifyRequest { inputs: chunk })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SentimentError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body: ClassifyResponse = response.json().await?;
        Ok(body.into_scores())
    }

    fn pick(&self, scores: &[LabelScore]) -> Result<ModelResult, SentimentError> {
        let best = scores
            .iter()
            .filter(|s| s.score.is_finite())
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| SentimentError::Adapter {
                model: self.kind.name().to_owned(),
                reason: "empty classification response".to_owned(),
            })?;

        let label = self
            .labels
            .map(&best.label)
            .ok_or_else(|| SentimentError::Adapter {
                model: self.kind.name().to_owned(),
                reason: format!("unmapped label '{}'", best.label),
            })?;

        Ok(ModelResult::new(label, best.score))
    }
}

#[async_trait]
impl SentimentModel for HttpClassifier {
    fn kind(&self) -> ModelKind {
        self.kind
    }

    async fn classify(&self, chunk: &str) -> Result<ModelResult, SentimentError> {
        let scores = retry_with_backoff(self.max_retries, BACKOFF_BASE_MS, || {
            self.request(chunk)
        })
        .await?;
        self.pick(&scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_map_handles_positional_labels() {
        let map = LabelMap::general();
        assert_eq!(map.map("LABEL_0"), Some(SentimentLabel::Negative));
        assert_eq!(map.map("LABEL_1"), Some(SentimentLabel::Neutral));
        assert_eq!(map.map("LABEL_2"), Some(SentimentLabel::Positive));
        assert_eq!(map.map("POSITIVE"), Some(SentimentLabel::Positive));
    }

    #[test]
    fn financial_map_is_case_insensitive() {
        let map = LabelMap::financial();
        assert_eq!(map.map("Negative"), Some(SentimentLabel::Negative));
        assert_eq!(map.map("LABEL_0"), None);
    }

    #[test]
    fn nested_and_flat_responses_parse() {
        let nested: ClassifyResponse =
            serde_json::from_str(r#"[[{"label":"positive","score":0.9}]]"#).unwrap();
        assert_eq!(nested.into_scores().len(), 1);

        let flat: ClassifyResponse = serde_json::from_str(
            r#"[{"label":"positive","score":0.9},{"label":"negative","score":0.1}]"#,
        )
        .unwrap();
        assert_eq!(flat.into_scores().len(), 2);
    }
}
