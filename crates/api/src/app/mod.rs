//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: user store and authenticator construction
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses
//! - `extract.rs`: extractors that reject with the same error body

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;

use crate::config::Settings;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(settings: &Settings, users: Arc<services::InMemoryUserStore>) -> Router {
    let authenticator = Arc::new(services::build_authenticator(settings, users.clone()));
    let auth_state = middleware::AuthState { authenticator };

    let services = Arc::new(services::AppServices { users });

    // Protected routes: a resolved identity is attached before any handler runs.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new().layer(TimeoutLayer::new(settings.request_timeout)))
}
