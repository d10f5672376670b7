//! Model adapters: one uniform `classify` capability over heterogeneous
//! inference backends.

mod classifier;
mod rules;
mod vader;

pub use classifier::{HttpClassifier, LabelMap};
pub use rules::RuleBasedModel;
pub use vader::VaderModel;

use async_trait::async_trait;

use crate::error::SentimentError;
use crate::types::{ModelKind, ModelResult};

/// A sentiment backend the ensemble can fan out to.
///
/// Implementations map their native label vocabulary onto
/// [`crate::SentimentLabel`] and return a confidence in `[0, 1]`. Errors are
/// turned into a failed [`ModelResult`] by the engine, never propagated to
/// the caller.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    fn kind(&self) -> ModelKind;

    /// Classify one normalized chunk.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError`] when the backend is unreachable or answers
    /// with something that cannot be mapped.
    async fn classify(&self, chunk: &str) -> Result<ModelResult, SentimentError>;
}
