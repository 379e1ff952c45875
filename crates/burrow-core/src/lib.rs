//! Core types and traits for the Burrow URL shortener.
//!
//! This crate provides the types shared by the shortener (write path) and
//! the redirector (read path): validated short codes, normalized targets,
//! the stored record, and the repository and cache contracts.

pub mod cache;
pub mod error;
pub mod repository;
pub mod shortcode;
pub mod shortener;
pub mod target;

pub use cache::UrlCache;
pub use error::{CacheError, CoreError, ShortenerError, StorageError};
pub use repository::{InsertOutcome, ReadRepository, Repository, UrlRecord};
pub use shortcode::ShortCode;
pub use shortener::Shortener;
pub use target::TargetUrl;
