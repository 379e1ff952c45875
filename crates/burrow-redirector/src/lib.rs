//! Redirector service library with caching support.
//!
//! This crate provides a [`RedirectorService`] that resolves short codes to
//! their target URLs. It never writes to the store. Reads can be served
//! through [`CachedRepository`], a repository decorator backed by a
//! size-bounded Moka cache.
//!
//! # Example
//!
//! ```rust
//! use burrow_redirector::{CachedRepository, MokaUrlCache, Redirector, RedirectorService};
//! use burrow_storage::InMemoryRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cached_repo = CachedRepository::new(InMemoryRepository::new(), MokaUrlCache::new());
//! let service = RedirectorService::new(cached_repo);
//!
//! match service.resolve("k3Fp9X").await {
//!     Ok(target) => println!("Redirect to: {}", target),
//!     Err(e) => println!("No redirect: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod redirector;
pub mod repository;
pub mod service;

pub use cache::{CacheConfig, MokaUrlCache};
pub use error::{RedirectorError, Result};
pub use redirector::Redirector;
pub use repository::CachedRepository;
pub use service::RedirectorService;
