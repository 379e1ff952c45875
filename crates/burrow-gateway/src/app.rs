use std::time::Duration;

use axum::http::{header, HeaderName, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{api_info_handler, health_handler, redirect_handler, shorten_handler};
use crate::state::AppState;

const CORS_MAX_AGE: Duration = Duration::from_secs(86_400);

pub struct App {}

impl App {
    /// Top-level path segments served by something other than a redirect.
    /// The allocator must never mint these as codes.
    pub const RESERVED_PATHS: &'static [&'static str] = &["health", "api"];

    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/api", get(api_info_handler))
            .route("/api/shorten", post(shorten_handler))
            .route("/{code}", get(redirect_handler))
            .layer(TraceLayer::new_for_http())
            .layer(Self::cors())
            .with_state(state)
    }

    fn cors() -> CorsLayer {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                HeaderName::from_static("x-requested-with"),
            ])
            .max_age(CORS_MAX_AGE)
    }
}
