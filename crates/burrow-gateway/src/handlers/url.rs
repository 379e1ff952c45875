use crate::error::{AppError, Result};
use crate::model::{ShortenRequest, ShortenResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use burrow_core::{ShortenerError, TargetUrl};
use tracing::info;

pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>> {
    let Json(request) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let raw = request
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("URL is required".to_string()))?;

    let target = TargetUrl::normalize(&raw).map_err(ShortenerError::from)?;
    let code = state.shortener.allocate(target.clone()).await?;
    let short_url = code.to_url(&state.base_url);

    info!(short_url = %short_url, target = %target, "shortened url");

    Ok(Json(ShortenResponse {
        short_url,
        short_code: code.as_str().to_string(),
        url: target.into_string(),
    }))
}

pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let target = state.redirector.resolve(&code).await?;
    let location = location_header(&target)?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Targets keep the bytes the user submitted, which may include non-ASCII
/// text that a header cannot carry. Those are sent percent-encoded.
fn location_header(target: &TargetUrl) -> Result<HeaderValue> {
    if let Ok(value) = HeaderValue::from_str(target.as_str()) {
        return Ok(value);
    }

    let encoded = target
        .to_url()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    HeaderValue::from_str(encoded.as_str()).map_err(|e| AppError::Internal(e.to_string()))
}
