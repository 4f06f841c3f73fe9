//! Typed errors and HTTP mapping.

use crate::metadata::CodecError;
use crate::response::NOT_FOUND_MESSAGE;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Startup settings that are missing or malformed. Fatal to startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {0:?} was not set")]
    Missing(String),
    #[error("environment variable {name:?} is not {expected}")]
    Invalid { name: String, expected: &'static str },
}

/// Failures of a [`ConfigStore`](crate::store::ConfigStore) operation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("configuration item was not found")]
    NotFound,
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("database: {0}")]
    Database(sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Database(other),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation: {0}")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(_) | AppError::Store(StoreError::NotFound) => {
                (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE.to_string())
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::Store(err) => {
                tracing::error!(error = %err, "store operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };
        (status, message).into_response()
    }
}
