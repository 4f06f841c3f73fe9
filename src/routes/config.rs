//! Configuration entry routes.

use crate::handlers::configs::{create_config, delete_config, get_config, list_configs, update_config};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn config_routes(state: AppState) -> Router {
    Router::new()
        .route("/configs", get(list_configs).post(create_config))
        .route(
            "/configs/:name",
            get(get_config)
                .put(update_config)
                .patch(update_config)
                .delete(delete_config),
        )
        .with_state(state)
}
