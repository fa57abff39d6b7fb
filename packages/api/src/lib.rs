// ABOUTME: HTTP API layer for Figstory providing the import and generation endpoints
// ABOUTME: Integration layer that wires the Figma importer and story generator to axum routes

use axum::{
    routing::{get, post},
    Router,
};

pub mod error;
pub mod generation_handlers;
pub mod import_handlers;
pub mod state;

pub use error::{ApiResult, AppError};
pub use state::{AppState, ServiceConfig};

fn routes() -> Router<AppState> {
    Router::new()
        .route("/import", post(import_handlers::import_frames))
        .route("/health", get(generation_handlers::generation_health))
        .route("/generate-stories", post(generation_handlers::generate_stories))
        .route("/generate-from-url", post(generation_handlers::generate_from_url))
}

/// Creates the API router, served both at the root and under `/api`
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes())
        .nest("/api", routes())
        .with_state(state)
}
