//! HTTP surface of the storefront document server.
//!
//! Exposes any [`DocumentStore`] over REST so that remote clients can use
//! [`storefront_core::HttpStore`] against it.

mod documents;

pub use documents::ApiError;

use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use storefront_core::DocumentStore;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
}

/// Builds the router with tracing enabled.
pub fn router(store: Arc<dyn DocumentStore>) -> Router {
    let state = AppState { store };

    Router::new()
        .route("/health", get(health))
        .route(
            "/collections/{collection}",
            get(documents::list_documents),
        )
        .route(
            "/collections/{collection}/{id}",
            get(documents::get_document)
                .put(documents::set_document)
                .patch(documents::update_document),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
