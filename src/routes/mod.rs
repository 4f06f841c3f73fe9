//! Router assembly and the middleware stack shared by every route.

pub mod common;
pub mod config;

pub use common::common_routes;
pub use config::config_routes;

use crate::state::AppState;
use axum::Router;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Upper bound for a single request, including reading the body and writing the response.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// All routes with request tracing, the body limit (413) and the request timeout (408).
pub fn app_router(state: AppState) -> Router {
    app_router_with_timeout(state, REQUEST_TIMEOUT)
}

/// [`app_router`] with a custom bound on each request.
pub fn app_router_with_timeout(state: AppState, timeout: Duration) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(config_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
                .layer(TimeoutLayer::new(timeout)),
        )
}
