use std::sync::Arc;

use crate::redirector::Redirector;
use crate::RedirectorError;
use async_trait::async_trait;
use burrow_core::shortcode::DEFAULT_LENGTH;
use burrow_core::{ReadRepository, ShortCode, TargetUrl};
use tracing::{debug, trace};

/// Service for handling URL redirects.
///
/// Uses a read-only repository to fetch URL records. Codes outside the
/// configured envelope (exact length, alphabet) are rejected before any
/// store access.
#[derive(Debug, Clone)]
pub struct RedirectorService<R> {
    repository: Arc<R>,
    code_length: usize,
}

impl<R: ReadRepository> RedirectorService<R> {
    /// Creates a new RedirectorService accepting codes of the default length.
    pub fn new(repository: R) -> Self {
        Self::with_code_length(repository, DEFAULT_LENGTH)
    }

    /// Creates a service accepting only codes of exactly `code_length` characters.
    pub fn with_code_length(repository: R, code_length: usize) -> Self {
        Self {
            repository: Arc::new(repository),
            code_length,
        }
    }

    pub fn code_length(&self) -> usize {
        self.code_length
    }
}

#[async_trait]
impl<R: ReadRepository> Redirector for RedirectorService<R> {
    async fn resolve(&self, code: &str) -> crate::Result<TargetUrl> {
        trace!(code, "resolving short code");

        let code = match ShortCode::parse(code, self.code_length) {
            Ok(code) => code,
            Err(e) => {
                debug!(code, error = %e, "Rejected malformed short code");
                return Err(RedirectorError::NotFound);
            }
        };

        match self.repository.get_by_code(&code).await? {
            Some(record) => {
                debug!(code = %code, url = %record.target, "Resolved short code");
                Ok(record.target)
            }
            None => {
                trace!(code = %code, "Short code not found");
                Err(RedirectorError::NotFound)
            }
        }
    }
}
