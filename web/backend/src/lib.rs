//! HTTP surface for the record collection: the collection document, the
//! self-healing artwork endpoints, static files and shelf bin labels.

pub mod bins;
pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let images = ServeDir::new(state.resolver.store().root());
    let statics = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/collection", get(handlers::get_collection))
        .route("/api/bin", get(handlers::list_bins))
        .route("/api/bin/:id", post(handlers::set_bin))
        .route("/cover/:id", get(handlers::cover_image))
        .route("/back/:id", get(handlers::back_image))
        .nest_service("/images", images)
        .nest_service("/static", statics)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
