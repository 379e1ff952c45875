use async_trait::async_trait;
use burrow_core::repository::{ReadRepository, Result, UrlRecord};
use burrow_core::{ShortCode, TargetUrl, UrlCache};
use tracing::trace;

/// A read-only repository decorator that adds caching.
///
/// This implementation composes any [`ReadRepository`] with any [`UrlCache`]
/// implementation to provide transparent read-through caching of lookups by
/// code. Lookups by target belong to the write path and always go to the
/// inner repository.
#[derive(Debug, Clone)]
pub struct CachedRepository<R, C> {
    inner: R,
    cache: C,
}

impl<R: ReadRepository, C: UrlCache> CachedRepository<R, C> {
    /// Creates a new cached repository decorator.
    ///
    /// # Example
    ///
    /// ```rust
    /// use burrow_redirector::{CachedRepository, MokaUrlCache};
    /// use burrow_storage::InMemoryRepository;
    ///
    /// let cached_repo = CachedRepository::new(InMemoryRepository::new(), MokaUrlCache::new());
    /// ```
    pub fn new(inner: R, cache: C) -> Self {
        Self { inner, cache }
    }

    /// Returns a reference to the inner repository.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Returns a reference to the cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }
}

#[async_trait]
impl<R: ReadRepository, C: UrlCache> ReadRepository for CachedRepository<R, C> {
    async fn get_by_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        trace!(code = %code, "Fetching URL record with cache");

        self.cache
            .get_or_compute(code, move |c| {
                let code = c.clone();
                async move {
                    trace!(code = %code, "Cache miss, fetching from inner repository");
                    self.inner.get_by_code(&code).await
                }
            })
            .await
    }

    async fn get_by_target(&self, target: &TargetUrl) -> Result<Option<UrlRecord>> {
        self.inner.get_by_target(target).await
    }
}
