use async_trait::async_trait;
use burrow_core::{CacheError, ShortCode, UrlCache, UrlRecord};
use moka::future::Cache;
use std::time::Duration;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// Type alias for cache results.
pub type Result<T> = std::result::Result<T, CacheError>;

const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// An in-memory cache implementation using Moka.
///
/// Mappings are immutable, so entries never need to expire for
/// correctness. The cache is bounded by entry count only; once full, Moka
/// evicts the least valuable entries and an evicted code simply falls
/// through to the repository again.
#[derive(Debug, Clone)]
pub struct MokaUrlCache {
    cache: Cache<String, UrlRecord>,
}

impl MokaUrlCache {
    /// Creates a new Moka URL cache with default settings.
    ///
    /// The cache will have a default maximum capacity of 10,000 entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    /// Creates a new Moka URL cache with a custom maximum capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        Self { cache }
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfig::builder()
    }

    /// Approximate number of cached entries.
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

impl Default for MokaUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for MokaUrlCache {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        match self.cache.get(code.as_str()).await {
            Some(record) => {
                debug!(code = %code, "Cache hit in Moka");
                Ok(Some(record))
            }
            None => {
                trace!(code = %code, "Cache miss in Moka");
                Ok(None)
            }
        }
    }

    async fn set_url(&self, code: &ShortCode, record: &UrlRecord) -> Result<()> {
        trace!(code = %code, "Storing URL record in Moka cache");
        self.cache
            .insert(code.as_str().to_string(), record.clone())
            .await;
        Ok(())
    }
}

/// Configuration for creating a MokaUrlCache with custom settings.
#[derive(Debug, TypedBuilder)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default = DEFAULT_MAX_CAPACITY)]
    max_capacity: u64,
    /// Drop entries nobody has read for this long, to shrink idle caches.
    #[builder(default)]
    time_to_idle: Option<Duration>,
}

impl From<CacheConfig> for MokaUrlCache {
    fn from(config: CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);

        if let Some(tti) = config.time_to_idle {
            builder = builder.time_to_idle(tti);
        }

        MokaUrlCache {
            cache: builder.build(),
        }
    }
}
