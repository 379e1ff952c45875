//! Mapping store backends for the Burrow URL shortener.
//!
//! - [`InMemoryRepository`]: lock-sharded maps, for tests and ephemeral runs.
//! - [`SqliteRepository`]: durable storage in a single SQLite file.
//! - [`TimeoutRepository`]: decorator that bounds every call with a deadline.

pub mod memory;
pub mod sqlite;
pub mod timeout;

pub use burrow_core::repository::{InsertOutcome, ReadRepository, Repository, UrlRecord};
pub use burrow_core::StorageError;
pub use memory::InMemoryRepository;
pub use sqlite::{SqliteRepository, SqliteSettings};
pub use timeout::TimeoutRepository;
