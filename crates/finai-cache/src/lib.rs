//! Result cache for finai.
//!
//! A raw key/value [`CacheStore`] (Redis in production, an in-process map in
//! development and tests) wrapped by [`ResultCache`], which stores typed,
//! schema-versioned entries and treats any store failure as a cache miss.

mod error;
mod keys;
mod memory;
mod redis_store;
mod typed;

pub use error::{CacheError, CacheResult};
pub use keys::{CacheKey, CACHE_VERSION};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use typed::{Cacheable, ResultCache};

use std::sync::Arc;
use std::time::Duration;

/// Default TTLs per entry kind.
pub mod ttl {
    use std::time::Duration;

    pub const VERDICT: Duration = Duration::from_secs(3600);
    pub const PROFILE: Duration = Duration::from_secs(3600);
    pub const RECOMMENDATIONS: Duration = Duration::from_secs(1800);
    pub const FEEDBACK: Duration = Duration::from_secs(86_400);
}

/// Raw string key/value store with per-entry expiry.
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()>;

    async fn delete(&self, key: &str) -> CacheResult<()>;
}

/// Redis at `redis_url` when given and reachable, otherwise an in-process
/// store. Startup never fails on the cache.
pub async fn connect_store(redis_url: Option<&str>) -> Arc<dyn CacheStore> {
    let Some(url) = redis_url else {
        tracing::info!("no Redis URL configured; using in-memory cache");
        return Arc::new(MemoryStore::new());
    };

    match RedisStore::connect(url).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!(error = %e, "redis unavailable; falling back to in-memory cache");
            Arc::new(MemoryStore::new())
        }
    }
}
