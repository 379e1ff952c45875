use thiserror::Error;

/// Errors raised while validating user-facing values.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out: {0}")]
    Timeout(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
}

/// Errors surfaced by the allocation (write) path.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    /// The submitted URL is empty or malformed. Never worth retrying.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Every candidate code collided with an existing one.
    #[error("no free short code found after {attempts} attempts")]
    ExhaustedRetries { attempts: u32 },
    /// The mapping store timed out or could not be reached.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StorageError),
}

impl ShortenerError {
    /// Whether the caller may resubmit the same request.
    ///
    /// Allocation is idempotent per target, so both server-side failures
    /// are safe to retry.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ShortenerError::InvalidInput(_))
    }
}

impl From<CoreError> for ShortenerError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidUrl(message) | CoreError::InvalidShortCode(message) => {
                Self::InvalidInput(message)
            }
        }
    }
}
