use crate::error::CacheError;
use crate::repository::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::future::Future;
use tracing::warn;

pub type Result<T> = std::result::Result<T, CacheError>;

/// A cache for URL records.
///
/// This trait provides a domain-specific caching abstraction for [`UrlRecord`]s,
/// using [`ShortCode`] as the key. Mappings never change once created, so a
/// cached entry can only go stale by being evicted; implementations bound
/// their size, not the age of entries.
#[async_trait]
pub trait UrlCache: Send + Sync + 'static {
    /// Get URL record from cache.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get_url(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Store URL record in cache.
    async fn set_url(&self, code: &ShortCode, record: &UrlRecord) -> Result<()>;

    /// Get URL record from cache, computing it with `fetch` if not present.
    ///
    /// Only hits are backfilled: a miss from `fetch` is not remembered, so a
    /// code allocated later is found on the next call. Cache failures are
    /// logged and treated as misses; only `fetch` errors reach the caller.
    async fn get_or_compute<F, Fut, E>(
        &self,
        code: &ShortCode,
        fetch: F,
    ) -> std::result::Result<Option<UrlRecord>, E>
    where
        F: FnOnce(&ShortCode) -> Fut + Send,
        Fut: Future<Output = std::result::Result<Option<UrlRecord>, E>> + Send,
        E: Send,
    {
        match self.get_url(code).await {
            Ok(Some(record)) => return Ok(Some(record)),
            Ok(None) => {}
            Err(e) => warn!(code = %code, error = %e, "cache read failed, falling back to fetch"),
        }

        let record = fetch(code).await?;
        if let Some(ref value) = record {
            if let Err(e) = self.set_url(code, value).await {
                warn!(code = %code, error = %e, "cache backfill failed");
            }
        }
        Ok(record)
    }
}
