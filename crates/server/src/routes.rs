use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, StatusCode},
    middleware,
    routing::{any, get},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use configs::PublicConfig;

use crate::{observability, openapi::ApiDoc};

pub mod config;
pub mod exams;

pub const EXAMS_FROM_MARKDOWN_PATH: &str = "/api/admin/exams/from-markdown";

#[derive(Clone, Default)]
pub struct AppState {
    /// `None` when the public variables were missing at startup.
    pub public_config: Option<Arc<PublicConfig>>,
}

impl AppState {
    pub fn new(public_config: Option<PublicConfig>) -> Self {
        Self { public_config: public_config.map(Arc::new) }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> (StatusCode, String) {
    observability::encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({"error": "not found"})))
}

/// Build the application router. Every response, including 404 and 405,
/// carries `X-Content-Type-Options: nosniff` and `X-Frame-Options: DENY`.
///
/// CORS covers the public routes only. Admin routes answer preflights
/// themselves, so the exams importer replies 405 to any `OPTIONS`.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/api/config/public", get(config::public_config))
        .layer(cors);

    let admin = Router::new().route(EXAMS_FROM_MARKDOWN_PATH, any(exams::exams_from_markdown));

    public
        .merge(admin)
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(observability::track_requests))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}
