use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{CacheStore, CACHE_VERSION};

/// A value that can be stored in the [`ResultCache`].
///
/// `KIND` is written into the envelope so a key can never be decoded as the
/// wrong entry type.
pub trait Cacheable: Serialize + DeserializeOwned + Send + Sync {
    const KIND: &'static str;
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T: Serialize> {
    schema_version: u32,
    kind: &'a str,
    payload: &'a T,
}

#[derive(Deserialize)]
struct Envelope {
    schema_version: u32,
    kind: String,
    payload: serde_json::Value,
}

/// Typed cache handle shared across requests.
///
/// Store errors never reach the caller: reads degrade to a miss and writes
/// are skipped, both with a `warn!`.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn CacheStore>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Fetch and decode a typed entry. Stale or mismatched envelopes are
    /// deleted and reported as a miss.
    pub async fn get<T: Cacheable>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key, kind = T::KIND, "cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "cache unavailable on read; treating as miss");
                return None;
            }
        };

        match decode::<T>(&raw) {
            Ok(value) => {
                tracing::debug!(key, kind = T::KIND, "cache hit");
                Some(value)
            }
            Err(reason) => {
                tracing::warn!(key, kind = T::KIND, reason = %reason, "discarding incompatible cache entry");
                self.delete(key).await;
                None
            }
        }
    }

    /// Encode and store a typed entry with the given TTL.
    pub async fn set<T: Cacheable>(&self, key: &str, value: &T, ttl: Duration) {
        let envelope = EnvelopeRef {
            schema_version: CACHE_VERSION,
            kind: T::KIND,
            payload: value,
        };
        let raw = match serde_json::to_string(&envelope) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache entry serialization failed; skipping write");
                return;
            }
        };

        if let Err(e) = self.store.set_ex(key, raw, ttl).await {
            tracing::warn!(key, error = %e, "cache unavailable on write; skipping");
        }
    }

    pub async fn delete(&self, key: &str) {
        if let Err(e) = self.store.delete(key).await {
            tracing::warn!(key, error = %e, "cache unavailable on delete");
        }
    }
}

fn decode<T: Cacheable>(raw: &str) -> Result<T, String> {
    let envelope: Envelope = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    if envelope.schema_version != CACHE_VERSION {
        return Err(format!(
            "schema version {} != {CACHE_VERSION}",
            envelope.schema_version
        ));
    }
    if envelope.kind != T::KIND {
        return Err(format!("kind '{}' != '{}'", envelope.kind, T::KIND));
    }
    serde_json::from_value(envelope.payload).map_err(|e| e.to_string())
}
