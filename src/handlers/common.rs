//! Banner, health and search placeholder.

use crate::response::SEARCH_PLACEHOLDER;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode};

/// GET /
pub async fn banner(State(state): State<AppState>) -> String {
    format!("{} - build {}", env!("CARGO_PKG_NAME"), state.release)
}

/// GET /healthz
pub async fn healthz(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.store.is_connected().await {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "notok")
    }
}

/// GET /search. Not implemented.
pub async fn search() -> &'static str {
    SEARCH_PLACEHOLDER
}
