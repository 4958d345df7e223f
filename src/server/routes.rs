//! Router configuration for the web server.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
///
/// No CORS layer: the server spends the stored API key, so only pages it
/// serves itself may call it. Cross-origin POSTs are refused outright.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        // Key management forms
        .route("/key", post(handlers::save_key))
        .route("/key/clear", post(handlers::clear_key))
        // Study pages
        .route(
            "/studies/:study_id",
            get(handlers::study_detail).post(handlers::analyze_form),
        )
        // JSON API
        .route("/api/studies", get(handlers::api_studies))
        .route("/api/studies/:study_id", get(handlers::api_study))
        .route(
            "/api/studies/:study_id/insights",
            post(handlers::api_insights),
        )
        .route("/health", get(handlers::health))
        .route("/static/style.css", get(handlers::serve_css))
        .layer(middleware::from_fn(handlers::require_same_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
