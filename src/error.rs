use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::connection::TransitionError;

/// Conditions the user has to fix outside discovery before retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("Please complete your profile first.")]
    MissingProfile,
    #[error("Please complete your profile before discovering others.")]
    IncompleteProfile,
    #[error("Please set your location first")]
    MissingLocation,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("{0}")]
    Precondition(#[from] Precondition),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::NotReceiver | TransitionError::NotSender => {
                AppError::Forbidden(err.to_string())
            }
            TransitionError::SelfConnection => AppError::Input(err.to_string()),
            _ => AppError::Conflict(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Input(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Precondition(p) => (StatusCode::BAD_REQUEST, p.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Database(e) => {
                tracing::error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
