//! URL shortener service implementation.
//!
//! This crate provides the allocation (write) path: normalize the submitted
//! URL, reuse the code already mapped to it, or mint a fresh one from a
//! [`Generator`](burrow_generator::Generator) and claim it atomically in the
//! repository. Core types are re-exported from `burrow_core`.

pub mod service;

pub use burrow_core::{Shortener, ShortenerError};
pub use service::{AllocatorSettings, ShortenerService};
