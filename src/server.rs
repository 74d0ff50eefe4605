//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::DefaultBodyLimit,
    http::{header::CACHE_CONTROL, HeaderValue},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api;
use crate::models::AppConfig;
use crate::services::{EncodeOptions, InMemorySessionStore, SessionStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            optimize_png: self.config.optimize_png,
            jpeg_quality: self.config.jpeg_quality,
        }
    }
}

/// Create application state with an in-memory session store bounded by
/// the configured session limits.
pub fn create_app_state(config: AppConfig) -> AppState {
    AppState {
        sessions: Arc::new(InMemorySessionStore::from_config(&config)),
        config: Arc::new(config),
    }
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
/// Responses default to `Cache-Control: no-cache`: session images change
/// under the same URL after every edit, so clients revalidate via ETag.
pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        // Session lifecycle
        .route("/api/sessions", post(api::handle_create_session))
        .route(
            "/api/sessions/:id",
            get(api::handle_get_session).delete(api::handle_delete_session),
        )
        .route("/api/sessions/:id/reset", post(api::handle_reset))
        // Editing
        .route("/api/sessions/:id/quantize", post(api::handle_quantize))
        .route("/api/sessions/:id/substitute", post(api::handle_substitute))
        // Sampling
        .route("/api/sessions/:id/pixel", get(api::handle_pixel))
        .route("/api/sessions/:id/eyedropper", get(api::handle_eyedropper))
        .route("/api/sessions/:id/viewport", get(api::handle_viewport))
        // Output
        .route("/api/sessions/:id/image", get(api::handle_image))
        .route("/api/sessions/:id/preview", get(api::handle_preview))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .layer(DefaultBodyLimit::max(upload_limit))
        // Add state and tracing
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
}
