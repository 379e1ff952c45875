use crate::model::{ApiInfoResponse, HealthResponse};
use axum::Json;

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn api_info_handler() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        message: "URL Shortener API is running",
    })
}
