//! Sentiment ensemble engine: normalize, fan out to adapters, combine, cache.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use finai_cache::{ttl, CacheKey, ResultCache};
use finai_core::AppConfig;
use futures::{future, StreamExt};
use sha2::{Digest, Sha256};

use crate::ensemble::{aggregate_chunks, combine};
use crate::error::SentimentError;
use crate::models::{HttpClassifier, LabelMap, RuleBasedModel, SentimentModel, VaderModel};
use crate::ner::{EntityExtractor, EntityMap, HttpEntityExtractor};
use crate::normalize::{chunk, normalize, Chunk};
use crate::types::{
    ModelKind, ModelResult, ModelSelector, SentimentLabel, SentimentVerdict, VerdictMetadata,
};

/// Maximum characters per chunk handed to an adapter.
pub const MAX_CHUNK_LEN: usize = 512;

/// Texts analyzed concurrently within one batch call.
const BATCH_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    /// Upper bound on one adapter's work for one text, retries included.
    pub adapter_timeout: Duration,
    pub max_chunk_len: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            adapter_timeout: Duration::from_millis(5_000),
            max_chunk_len: MAX_CHUNK_LEN,
        }
    }
}

pub struct SentimentEngine {
    models: Vec<Arc<dyn SentimentModel>>,
    extractor: Option<Arc<dyn EntityExtractor>>,
    cache: ResultCache,
    settings: EngineSettings,
}

impl SentimentEngine {
    #[must_use]
    pub fn new(
        models: Vec<Arc<dyn SentimentModel>>,
        cache: ResultCache,
        settings: EngineSettings,
    ) -> Self {
        Self {
            models,
            extractor: None,
            cache,
            settings,
        }
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: Arc<dyn EntityExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Wire the standard adapter set from configuration.
    ///
    /// The two lexicon adapters are always present. The HTTP classifiers and
    /// the entity extractor are registered only when their URL is set.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if an HTTP client cannot be built.
    pub fn from_config(config: &AppConfig, cache: ResultCache) -> Result<Self, SentimentError> {
        let adapter_timeout = Duration::from_millis(config.model_timeout_ms);
        let mut models: Vec<Arc<dyn SentimentModel>> = vec![
            Arc::new(VaderModel::new()),
            Arc::new(RuleBasedModel::new()),
        ];

        if let Some(url) = &config.financial_model_url {
            models.push(Arc::new(HttpClassifier::new(
                url,
                ModelKind::FinancialClassifier,
                LabelMap::financial(),
                adapter_timeout,
                config.model_max_retries,
            )?));
        }
        if let Some(url) = &config.general_model_url {
            models.push(Arc::new(HttpClassifier::new(
                url,
                ModelKind::GeneralClassifier,
                LabelMap::general(),
                adapter_timeout,
                config.model_max_retries,
            )?));
        }

        let registered: Vec<&str> = models.iter().map(|m| m.kind().name()).collect();
        tracing::info!(models = ?registered, "sentiment adapters registered");

        let mut engine = Self::new(
            models,
            cache,
            EngineSettings {
                adapter_timeout,
                ..EngineSettings::default()
            },
        );
        if let Some(url) = &config.ner_url {
            engine = engine.with_extractor(Arc::new(HttpEntityExtractor::new(url, adapter_timeout)?));
        }
        Ok(engine)
    }

    /// Analyze one text.
    ///
    /// Entities are attached only when requested and an extractor is
    /// configured; an extractor failure leaves `entities` unset.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::InvalidInput`] for blank text. Adapter
    /// failures never surface here.
    pub async fn analyze(
        &self,
        text: &str,
        include_entities: bool,
        selector: ModelSelector,
    ) -> Result<SentimentVerdict, SentimentError> {
        if text.trim().is_empty() {
            return Err(SentimentError::InvalidInput("text must not be empty".to_owned()));
        }

        let key = CacheKey::sentiment(&text_hash(text), selector.as_str());
        if let Some(mut verdict) = self.cache.get::<SentimentVerdict>(&key).await {
            self.reconcile_entities(&mut verdict, text, include_entities)
                .await;
            return Ok(verdict);
        }

        let processed = normalize(text);
        let chunks = chunk(&processed, self.settings.max_chunk_len);

        let results = future::join_all(
            self.models
                .iter()
                .filter(|m| selector.includes(m.kind()))
                .map(|m| self.run_model(m.as_ref(), &chunks)),
        )
        .await;

        let combination = combine(&results);
        let no_model_succeeded = combination.no_model_succeeded();
        if no_model_succeeded {
            tracing::warn!(selector = %selector, "no sentiment model succeeded");
        }

        let mut verdict = SentimentVerdict {
            label: combination.label,
            confidence: combination.confidence,
            scores: combination.scores,
            per_model: results
                .into_iter()
                .map(|(kind, result)| (kind.name().to_owned(), result))
                .collect(),
            models_used: combination.models_used,
            total_weight: combination.total_weight,
            no_model_succeeded,
            entities: None,
            error: None,
            metadata: VerdictMetadata {
                text_length: text.chars().count(),
                processed_length: processed.chars().count(),
                chunk_count: chunks.len(),
                oversized_chunks: chunks.iter().filter(|c| c.oversized).count(),
                model_selector: selector,
                analyzed_at: Utc::now(),
            },
        };

        if include_entities {
            verdict.entities = self.extract_entities(text).await;
        }

        // Only verdicts where every adapter answered are memoized.
        if verdict.per_model.values().all(ModelResult::succeeded) {
            self.cache.set(&key, &verdict, ttl::VERDICT).await;
        }

        tracing::info!(
            label = %verdict.label,
            confidence = verdict.confidence,
            models = verdict.models_used.len(),
            chunks = verdict.metadata.chunk_count,
            "sentiment analyzed"
        );
        Ok(verdict)
    }

    /// Analyze many texts concurrently. Output order matches input order; a
    /// text that cannot be analyzed yields a `{neutral, 0.5}` placeholder
    /// with `error` set.
    pub async fn analyze_batch(
        &self,
        texts: &[String],
        selector: ModelSelector,
    ) -> Vec<SentimentVerdict> {
        let items: Vec<_> = texts
            .iter()
            .enumerate()
            .map(|(index, text)| async move {
                match self.analyze(text, false, selector).await {
                    Ok(verdict) => verdict,
                    Err(e) => {
                        tracing::warn!(index, error = %e, "batch item failed; using placeholder");
                        placeholder_verdict(text, selector, e.to_string())
                    }
                }
            })
            .collect();
        futures::stream::iter(items)
            .buffered(BATCH_CONCURRENCY)
            .collect()
            .await
    }

    async fn run_model(
        &self,
        model: &dyn SentimentModel,
        chunks: &[Chunk],
    ) -> (ModelKind, ModelResult) {
        let kind = model.kind();
        let timeout = self.settings.adapter_timeout;

        let classify_all =
            future::try_join_all(chunks.iter().map(|c| model.classify(&c.text)));
        let outcome = match tokio::time::timeout(timeout, classify_all).await {
            Ok(result) => result,
            Err(_) => Err(SentimentError::Timeout {
                model: kind.name().to_owned(),
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        };

        match outcome {
            Ok(per_chunk) => (kind, aggregate_chunks(&per_chunk)),
            Err(e) => {
                tracing::warn!(model = kind.name(), error = %e, "sentiment adapter failed");
                (kind, ModelResult::failed(e.to_string()))
            }
        }
    }

    async fn extract_entities(&self, text: &str) -> Option<EntityMap> {
        let extractor = self.extractor.as_ref()?;
        match tokio::time::timeout(self.settings.adapter_timeout, extractor.extract(text)).await {
            Ok(Ok(entities)) => Some(entities),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "entity extraction failed");
                None
            }
            Err(_) => {
                tracing::warn!("entity extraction timed out");
                None
            }
        }
    }

    /// A cached verdict is shared between requests with and without
    /// entities; fill or strip them to match this request.
    async fn reconcile_entities(
        &self,
        verdict: &mut SentimentVerdict,
        text: &str,
        include_entities: bool,
    ) {
        if !include_entities {
            verdict.entities = None;
        } else if verdict.entities.is_none() {
            verdict.entities = self.extract_entities(text).await;
        }
    }
}

/// Hex SHA-256 of the raw input text.
#[must_use]
pub fn text_hash(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

fn placeholder_verdict(text: &str, selector: ModelSelector, error: String) -> SentimentVerdict {
    SentimentVerdict {
        label: SentimentLabel::Neutral,
        confidence: 0.5,
        scores: SentimentLabel::ALL.iter().map(|l| (*l, 0.0)).collect(),
        per_model: BTreeMap::new(),
        models_used: Vec::new(),
        total_weight: 0.0,
        no_model_succeeded: true,
        entities: None,
        error: Some(error),
        metadata: VerdictMetadata {
            text_length: text.chars().count(),
            processed_length: 0,
            chunk_count: 0,
            oversized_chunks: 0,
            model_selector: selector,
            analyzed_at: Utc::now(),
        },
    }
}
