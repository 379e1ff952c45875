use async_trait::async_trait;
use burrow_core::error::StorageError;
use burrow_core::repository::{InsertOutcome, ReadRepository, Repository, Result, UrlRecord};
use burrow_core::{ShortCode, TargetUrl};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// A repository decorator that bounds every call with a deadline.
///
/// An elapsed deadline becomes [`StorageError::Timeout`], which callers
/// surface as a retryable failure instead of hanging. The inner future is
/// dropped on timeout; backends must only commit whole records (see
/// [`Repository::insert_if_absent`]), so nothing is left half-written.
#[derive(Debug, Clone)]
pub struct TimeoutRepository<R> {
    inner: R,
    timeout: Duration,
}

impl<R> TimeoutRepository<R> {
    pub fn new(inner: R, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "store operation timed out"
                );
                Err(StorageError::Timeout(format!(
                    "{operation} exceeded {:?}",
                    self.timeout
                )))
            }
        }
    }
}

#[async_trait]
impl<R: ReadRepository> ReadRepository for TimeoutRepository<R> {
    async fn get_by_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        self.bounded("get_by_code", self.inner.get_by_code(code)).await
    }

    async fn get_by_target(&self, target: &TargetUrl) -> Result<Option<UrlRecord>> {
        self.bounded("get_by_target", self.inner.get_by_target(target)).await
    }
}

#[async_trait]
impl<R: Repository> Repository for TimeoutRepository<R> {
    async fn insert_if_absent(&self, record: UrlRecord) -> Result<InsertOutcome> {
        self.bounded("insert_if_absent", self.inner.insert_if_absent(record)).await
    }
}
