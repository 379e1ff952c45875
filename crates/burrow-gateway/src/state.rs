use std::sync::Arc;

use burrow_core::Shortener;
use burrow_redirector::Redirector;

#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<dyn Shortener>,
    pub redirector: Arc<dyn Redirector>,
    pub base_url: String,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        redirector: Arc<dyn Redirector>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            shortener,
            redirector,
            base_url: public_base_url.into(),
        }
    }
}
