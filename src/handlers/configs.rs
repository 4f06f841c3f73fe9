//! Configuration entry handlers: list, read, create, update, delete.

use crate::error::AppError;
use crate::response::{text_ok, CREATED_MESSAGE, DELETED_MESSAGE, UPDATED_MESSAGE};
use crate::state::AppState;
use crate::store::{ConfigEntry, NewConfig};
use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};

fn require_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        return Err(AppError::Validation("name path parameter is required".into()));
    }
    Ok(())
}

/// Decode the raw body so every malformed payload is a 400, whatever the content type.
/// `id` in the body is accepted and ignored.
fn parse_body(body: &Bytes) -> Result<NewConfig, AppError> {
    serde_json::from_slice(body).map_err(|err| AppError::BadRequest(err.to_string()))
}

/// GET /configs
pub async fn list_configs(State(state): State<AppState>) -> Result<Json<Vec<ConfigEntry>>, AppError> {
    let entries = state.store.list().await?;
    Ok(Json(entries))
}

/// GET /configs/:name
pub async fn get_config(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ConfigEntry>, AppError> {
    require_name(&name)?;
    let entry = state.store.get_by_name(&name).await?;
    Ok(Json(entry))
}

/// POST /configs
pub async fn create_config(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let config = parse_body(&body)?;
    let id = state.store.insert(&config).await?;
    tracing::info!(id, name = %config.name, "configuration item added");
    Ok(text_ok(CREATED_MESSAGE))
}

/// PUT|PATCH /configs/:name. Replaces the metadata; the body's name is ignored.
pub async fn update_config(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<impl axum::response::IntoResponse, AppError> {
    require_name(&name)?;
    let config = parse_body(&body)?;
    let touched = state.store.update_by_name(&name, &config.metadata).await?;
    tracing::debug!(name = %name, touched, "configuration item updated");
    Ok(text_ok(UPDATED_MESSAGE))
}

/// DELETE /configs/:name
pub async fn delete_config(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    require_name(&name)?;
    let removed = state.store.delete_by_name(&name).await?;
    tracing::debug!(name = %name, removed, "configuration item erased");
    Ok(text_ok(DELETED_MESSAGE))
}
