//! Multi-model sentiment analysis for finai.
//!
//! Raw text is normalized and chunked, classified by every selected model
//! adapter concurrently (each bounded by a timeout), and combined into a
//! single weighted [`SentimentVerdict`]. Verdicts are memoized in the shared
//! [`finai_cache::ResultCache`].

pub mod engine;
pub mod ensemble;
pub mod error;
pub mod market;
pub mod models;
pub mod ner;
pub mod normalize;
pub mod types;

mod retry;

pub use engine::{EngineSettings, SentimentEngine};
pub use error::SentimentError;
pub use market::{summarize_market_sentiment, MarketSentimentSummary};
pub use models::{HttpClassifier, LabelMap, RuleBasedModel, SentimentModel, VaderModel};
pub use ner::{EntityExtractor, HttpEntityExtractor};
pub use normalize::{chunk, normalize, Chunk};
pub use types::{
    Entity, ModelKind, ModelResult, ModelSelector, SentimentLabel, SentimentVerdict, Span,
    VerdictMetadata,
};
