use crate::Result;
use async_trait::async_trait;
use burrow_core::TargetUrl;

/// The read-path entry point consumed by transport layers.
#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a raw short code to the exact target stored for it.
    async fn resolve(&self, code: &str) -> Result<TargetUrl>;
}
