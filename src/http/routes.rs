use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Job lifecycle
        .route("/api/v1/upload", post(handlers::upload_audio))
        .route("/api/v1/start/:job_id", post(handlers::start_pipeline))
        .route("/api/v1/status/:job_id", get(handlers::get_job_status))
        // Upload slots minted by the upload endpoint
        .route("/uploads/:token", put(handlers::put_upload))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
