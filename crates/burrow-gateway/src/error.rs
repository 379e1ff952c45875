use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use burrow_core::ShortenerError;
use burrow_redirector::RedirectorError;
use tracing::{error, warn};

use crate::model::{ErrorBody, ErrorDetail};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    InvalidInput(String),
    NotFound,
    AllocationFailed(String),
    StoreUnavailable(String),
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::AllocationFailed(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::NotFound => "NotFound",
            AppError::AllocationFailed(_) => "AllocationFailed",
            AppError::StoreUnavailable(_) => "StoreUnavailable",
            AppError::Internal(_) => "Internal",
        }
    }

    fn message(self) -> String {
        match self {
            AppError::NotFound => "short code not found".to_string(),
            AppError::InvalidInput(m)
            | AppError::AllocationFailed(m)
            | AppError::StoreUnavailable(m)
            | AppError::Internal(m) => m,
        }
    }
}

impl From<ShortenerError> for AppError {
    fn from(value: ShortenerError) -> Self {
        match value {
            ShortenerError::InvalidInput(m) => AppError::InvalidInput(m),
            e @ ShortenerError::ExhaustedRetries { .. } => {
                AppError::AllocationFailed(e.to_string())
            }
            ShortenerError::StoreUnavailable(e) => AppError::StoreUnavailable(e.to_string()),
        }
    }
}

impl From<RedirectorError> for AppError {
    fn from(value: RedirectorError) -> Self {
        match value {
            RedirectorError::NotFound => AppError::NotFound,
            RedirectorError::StoreUnavailable(e) => AppError::StoreUnavailable(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let message = self.message();

        if status.is_server_error() {
            if status == StatusCode::SERVICE_UNAVAILABLE {
                warn!(kind, message = %message, "request failed");
            } else {
                error!(kind, message = %message, "request failed");
            }
        }

        let body = ErrorBody {
            error: ErrorDetail { kind, message },
        };
        (status, Json(body)).into_response()
    }
}
