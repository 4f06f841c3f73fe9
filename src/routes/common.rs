//! Common routes: banner, health, search placeholder.

use crate::handlers::common::{banner, healthz, search};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/healthz", get(healthz))
        .route("/search", get(search))
        .with_state(state)
}
