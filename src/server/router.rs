use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::config::AppConfig;
use crate::server::handlers::{ask, health, history, page};
use crate::state::AppState;

/// Creates the application router with all routes and middleware.
///
/// One page, one ask endpoint, history for the sidebar, and operational
/// endpoints (health/status/reindex).
pub fn router(state: Arc<AppState>) -> Router {
    let cors_layer = build_cors_layer(&state.config);
    Router::new()
        .route("/", get(page::index))
        .route("/health", get(health::health))
        .route("/api/status", get(health::status))
        .route("/api/ask", post(ask::ask))
        .route("/api/reindex", post(ask::reindex))
        .route(
            "/api/history",
            get(history::recent).delete(history::clear_today),
        )
        .route("/api/history/all", delete(history::clear_all))
        .with_state(state)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
}

fn build_cors_layer(config: &AppConfig) -> CorsLayer {
    let configured = &config.server.cors_allowed_origins;
    let origins = if configured.is_empty() {
        default_local_origins()
    } else {
        configured.clone()
    };

    let allow_origin = AllowOrigin::list(
        origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect::<Vec<_>>(),
    );

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE])
}

fn default_local_origins() -> Vec<String> {
    vec![
        "http://localhost".to_string(),
        "http://localhost:8080".to_string(),
        "http://localhost:5173".to_string(),
        "http://127.0.0.1".to_string(),
        "http://127.0.0.1:8080".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}
