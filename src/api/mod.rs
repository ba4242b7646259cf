//! HTTP surface: upload, query, session management and liveness.

pub mod query;
pub mod session;
pub mod upload;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::models::{HealthResponse, RootResponse};
use crate::session::SESSION_HEADER;
use crate::state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes();
    let cors = cors_layer(&state.config.cors_origin);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/upload", post(upload::upload))
        .route("/query", post(query::query))
        .route("/session", delete(session::delete_session))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static(SESSION_HEADER),
        ]);

    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid CORS origin {origin:?}");
            layer
        }
    }
}

/// GET / - Liveness message
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "DocSentry sensitive data detector is running.".to_string(),
    })
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        sessions: state.sessions.len(),
    })
}
