//! HTTP API application wiring (axum router + service wiring).
//!
//! - `services.rs`: shared infrastructure (document store, token codec)
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses
//! - `uploads.rs`: multipart picture intake

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Extension, Router};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;
pub mod uploads;

/// Uploaded pictures are capped at 20 MB.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> Router {
    let services = Arc::new(services::build_services(config));
    let auth_state = middleware::AuthState {
        codec: services.codec.clone(),
    };

    // Protected routes: require a verified bearer token.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/auth", routes::auth::router())
        .merge(protected)
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
        .layer(Extension(services))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
}
