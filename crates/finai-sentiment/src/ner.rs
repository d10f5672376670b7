//! Named-entity extraction boundary.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SentimentError;
use crate::types::{Entity, Span};

/// Entity types reported on a verdict. Anything else the extractor emits is
/// dropped.
pub const ENTITY_TYPES: &[&str] = &["PERSON", "ORG", "MONEY", "PERCENT", "DATE", "GPE", "PRODUCT"];

pub type EntityMap = BTreeMap<String, Vec<Entity>>;

/// External NER capability.
#[async_trait]
pub trait EntityExtractor: Send + Sync {
    /// Extract entities grouped by type. Every type in [`ENTITY_TYPES`] is
    /// present in the result, possibly with an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError`] when the extractor is unavailable.
    async fn extract(&self, text: &str) -> Result<EntityMap, SentimentError>;
}

#[derive(Serialize)]
struct NerRequest<'a> {
    inputs: &'a str,
}

/// One span as emitted by token-classification servers.
#[derive(Debug, Deserialize)]
struct RawEntity {
    #[serde(alias = "entity")]
    entity_group: String,
    #[serde(alias = "text")]
    word: String,
    start: usize,
    end: usize,
    #[serde(default)]
    score: Option<f64>,
}

/// Group raw spans by type, keeping only known types. A missing score
/// becomes confidence `1.0`.
fn group_entities(raw: Vec<RawEntity>) -> EntityMap {
    let mut grouped: EntityMap = ENTITY_TYPES
        .iter()
        .map(|t| ((*t).to_owned(), Vec::new()))
        .collect();

    for entity in raw {
        let kind = entity.entity_group.trim().to_ascii_uppercase();
        if let Some(bucket) = grouped.get_mut(&kind) {
            bucket.push(Entity {
                text: entity.word.trim().to_owned(),
                span: Span {
                    start: entity.start,
                    end: entity.end,
                },
                confidence: entity.score.map_or(1.0, |s| s.clamp(0.0, 1.0)),
            });
        }
    }
    grouped
}

pub struct HttpEntityExtractor {
    client: reqwest::Client,
    url: String,
}

impl HttpEntityExtractor {
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built.
    pub fn new(url: &str, request_timeout: Duration) -> Result<Self, SentimentError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.to_owned(),
        })
    }
}

#[async_trait]
impl EntityExtractor for HttpEntityExtractor {
    async fn extract(&self, text: &str) -> Result<EntityMap, SentimentError> {
        let response = self
            .client
            .post(&self.url)
            .json(&NerRequest { inputs: text })
            .send()
            .await
            .map_err(|e| SentimentError::Entities(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SentimentError::Entities(format!(
                "extractor returned status {}",
                response.status()
            )));
        }

        let raw: Vec<RawEntity> = response
            .json()
            .await
            .map_err(|e| SentimentError::Entities(format!("response parse error: {e}")))?;

        Ok(group_entities(raw))
    }
}
