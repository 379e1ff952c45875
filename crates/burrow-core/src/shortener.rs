use crate::error::ShortenerError;
use crate::shortcode::ShortCode;
use crate::target::TargetUrl;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, ShortenerError>;

/// The write-path entry point consumed by transport layers.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Returns the short code mapped to an already-normalized target,
    /// allocating one if the target has never been seen.
    async fn allocate(&self, target: TargetUrl) -> Result<ShortCode>;

    /// Normalizes `url`, then allocates.
    async fn shorten(&self, url: &str) -> Result<ShortCode> {
        let target = TargetUrl::normalize(url)?;
        self.allocate(target).await
    }
}
