//! Shared application state for all routes.

use crate::store::ConfigStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ConfigStore>,
    /// Build tag shown in the root banner.
    pub release: &'static str,
}

impl AppState {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self {
            store,
            release: release_tag(),
        }
    }
}

/// Release tag baked in at compile time through `FRESH_SERVER_RELEASE`, `dev` otherwise.
pub fn release_tag() -> &'static str {
    match option_env!("FRESH_SERVER_RELEASE") {
        Some(tag) if !tag.is_empty() => tag,
        _ => "dev",
    }
}
