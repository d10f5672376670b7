//! Cache key schema.
//!
//! Format: `v{VERSION}:{kind}:{identifier}[:sub_key]`. Bump [`CACHE_VERSION`]
//! whenever a cached payload changes shape.

/// Cache schema version.
pub const CACHE_VERSION: u32 = 1;

pub struct CacheKey;

impl CacheKey {
    /// Format: `v1:sentiment:{text_hash}:{selector}`
    #[must_use]
    pub fn sentiment(text_hash: &str, selector: &str) -> String {
        format!("v{CACHE_VERSION}:sentiment:{text_hash}:{selector}")
    }

    /// Format: `v1:profile:{user_id}`
    #[must_use]
    pub fn profile(user_id: i64) -> String {
        format!("v{CACHE_VERSION}:profile:{user_id}")
    }

    /// Format: `v1:recommendations:{user_id}`
    #[must_use]
    pub fn recommendations(user_id: i64) -> String {
        format!("v{CACHE_VERSION}:recommendations:{user_id}")
    }

    /// Format: `v1:feedback:{user_id}:{item_id}`
    #[must_use]
    pub fn feedback(user_id: i64, item_id: &str) -> String {
        format!("v{CACHE_VERSION}:feedback:{user_id}:{item_id}")
    }
}
