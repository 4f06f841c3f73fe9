//! Fixed response texts.

use axum::http::StatusCode;

pub const NOT_FOUND_MESSAGE: &str = "configuration item was not found";
pub const CREATED_MESSAGE: &str = "new configuration item has successfully been added";
pub const UPDATED_MESSAGE: &str = "new configuration item has successfully been updated";
pub const DELETED_MESSAGE: &str = "configuration item has successfully been erased";
pub const SEARCH_PLACEHOLDER: &str = "Search GET!";

/// 200 with a plain-text body.
pub fn text_ok(message: impl Into<String>) -> (StatusCode, String) {
    (StatusCode::OK, message.into())
}
