use crate::error::StorageError;
use crate::shortcode::ShortCode;
use crate::target::TargetUrl;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored mapping from a short code to its target.
///
/// Records are created once and never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The short code, unique across all records.
    pub code: ShortCode,
    /// The normalized URL the code redirects to, unique across all records.
    pub target: TargetUrl,
    /// When the mapping was first allocated.
    pub created_at: Timestamp,
}

impl UrlRecord {
    /// Creates a record stamped with the current time.
    pub fn new(code: ShortCode, target: TargetUrl) -> Self {
        Self {
            code,
            target,
            created_at: Timestamp::now(),
        }
    }
}

/// Result of an atomic insert-if-absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record is now the one stored under its code.
    Inserted(UrlRecord),
    /// The target is already mapped; carries the record that owns it.
    DuplicateTarget(UrlRecord),
    /// Another target already owns the candidate code.
    CodeTaken,
}

/// A read-only view of a repository.
///
/// This trait provides only the read operations from [`Repository`],
/// allowing services like the redirector to have read-only access.
/// Implementations report anything that is no longer live as `None`.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the record for a given short code.
    async fn get_by_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Retrieves the record mapped to a target, if any. Used for dedup.
    async fn get_by_target(&self, target: &TargetUrl) -> Result<Option<UrlRecord>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Stores `record` unless its code or its target is already taken.
    ///
    /// Must be a single atomic step: two callers racing on the same code
    /// never both see `Inserted`, and two callers racing on the same target
    /// end up with one stored record.
    async fn insert_if_absent(&self, record: UrlRecord) -> Result<InsertOutcome>;
}

#[async_trait]
impl<R: ReadRepository + ?Sized> ReadRepository for Arc<R> {
    async fn get_by_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        (**self).get_by_code(code).await
    }

    async fn get_by_target(&self, target: &TargetUrl) -> Result<Option<UrlRecord>> {
        (**self).get_by_target(target).await
    }
}

#[async_trait]
impl<R: Repository + ?Sized> Repository for Arc<R> {
    async fn insert_if_absent(&self, record: UrlRecord) -> Result<InsertOutcome> {
        (**self).insert_if_absent(record).await
    }
}
