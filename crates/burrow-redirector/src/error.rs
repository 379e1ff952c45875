use burrow_core::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RedirectorError>;

#[derive(Debug, Clone, Error)]
pub enum RedirectorError {
    /// The code is malformed, unknown, or no longer live.
    #[error("short code not found")]
    NotFound,
    /// The store failed; the lookup may succeed if retried.
    #[error("store unavailable: {0}")]
    StoreUnavailable(
        #[from]
        #[source]
        StorageError,
    ),
}
