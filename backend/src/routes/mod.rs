/// Liveness endpoint
pub mod health;

/// Image upload and URL lookup
pub mod images;

use axum::{
    routing::{get, post},
    Router,
};

/// Creates the router with all handler routes
#[must_use]
pub fn handler() -> Router {
    Router::new()
        .route("/health", get(health::handler))
        .route("/v1/images", post(images::upload_image))
        .route("/v1/images/url", get(images::resolve_image_url))
}
