mod health;
mod url;

pub use health::{ApiInfoResponse, HealthResponse};
pub use url::{ErrorBody, ErrorDetail, ShortenRequest, ShortenResponse};
