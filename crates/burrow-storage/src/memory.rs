use async_trait::async_trait;
use burrow_core::repository::{InsertOutcome, ReadRepository, Repository, Result, UrlRecord};
use burrow_core::{ShortCode, TargetUrl};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking.
///
/// Two indices are kept: code -> record and target -> record. An insert
/// holds the target's shard lock while it claims the code, so the pair is
/// written in one critical section. Locks are always taken target first,
/// then code, and readers only ever hold one at a time.
///
/// Nothing here survives a restart; use [`SqliteRepository`] for that.
///
/// [`SqliteRepository`]: crate::SqliteRepository
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    by_code: DashMap<String, UrlRecord>,
    by_target: DashMap<String, UrlRecord>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get_by_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self
            .by_code
            .get(code.as_str())
            .map(|entry| entry.value().clone()))
    }

    async fn get_by_target(&self, target: &TargetUrl) -> Result<Option<UrlRecord>> {
        Ok(self
            .by_target
            .get(target.as_str())
            .map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert_if_absent(&self, record: UrlRecord) -> Result<InsertOutcome> {
        let target_slot = match self.by_target.entry(record.target.as_str().to_owned()) {
            Entry::Occupied(existing) => {
                return Ok(InsertOutcome::DuplicateTarget(existing.get().clone()));
            }
            Entry::Vacant(slot) => slot,
        };

        match self.by_code.entry(record.code.as_str().to_owned()) {
            Entry::Occupied(_) => Ok(InsertOutcome::CodeTaken),
            Entry::Vacant(code_slot) => {
                code_slot.insert(record.clone());
                target_slot.insert(record.clone());
                Ok(InsertOutcome::Inserted(record))
            }
        }
    }
}
