//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: infrastructure wiring (pool, authenticator, engines)
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request DTOs
//! - `errors.rs`: the `{success, ...}` response envelope and status mapping

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::ServiceBuilder;

/// Upper bound on in-flight requests across all routes.
const MAX_IN_FLIGHT_REQUESTS: usize = 1024;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<services::AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        services: services.clone(),
    };

    // Everything except login and the health probe sits behind the gate.
    let protected = routes::router()
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn_with_state(
            auth_state.clone(),
            middleware::auth_middleware,
        ));

    // Public routes still get a context when a valid bearer is presented.
    let public = Router::new()
        .route("/health", get(routes::system::health))
        .route("/auth/login", axum::routing::post(routes::auth::login))
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::optional_auth_middleware,
        ));

    public.merge(protected).layer(
        ServiceBuilder::new().layer(GlobalConcurrencyLimitLayer::new(MAX_IN_FLIGHT_REQUESTS)),
    )
}
