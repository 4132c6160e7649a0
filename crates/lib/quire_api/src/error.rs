//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use quire_core::CoreError;
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    CategoryNotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has been revoked")]
    TokenRevoked,

    #[error("Fresh token required")]
    FreshTokenRequired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::CategoryNotFound(m) => {
                (StatusCode::NOT_FOUND, "category_not_found", m.as_str())
            }
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::InvalidToken(m) => (StatusCode::UNAUTHORIZED, "invalid_token", m.as_str()),
            AppError::TokenRevoked => (
                StatusCode::UNAUTHORIZED,
                "token_revoked",
                "Token has been revoked",
            ),
            AppError::FreshTokenRequired => (
                StatusCode::UNAUTHORIZED,
                "fresh_token_required",
                "Fresh token required",
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid credentials",
            ),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, "forbidden", m.as_str()),
            AppError::Conflict(m) => (StatusCode::CONFLICT, "conflict", m.as_str()),
            AppError::Storage(m) => {
                error!(error = %m, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    "Storage error",
                )
            }
            AppError::Internal(m) => {
                error!(error = %m, "internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidToken(msg) => AppError::InvalidToken(msg),
            CoreError::Revoked => AppError::TokenRevoked,
            CoreError::StaleCredential => AppError::FreshTokenRequired,
            CoreError::Forbidden(msg) => AppError::Forbidden(msg),
            e @ CoreError::CategoryNotFound(_) => AppError::CategoryNotFound(e.to_string()),
            CoreError::Conflict(field) => AppError::Conflict(format!("{field} already exists")),
            CoreError::NotFound(msg) => AppError::NotFound(msg),
            CoreError::InvalidCredentials => AppError::InvalidCredentials,
            CoreError::Validation(msg) => AppError::Validation(msg),
            CoreError::StorageError(e) => AppError::Storage(e.to_string()),
            CoreError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::from(CoreError::from(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::UniqueField;

    fn status_of(e: CoreError) -> StatusCode {
        AppError::from(e).into_response().status()
    }

    #[test]
    fn core_errors_map_to_statuses() {
        assert_eq!(
            status_of(CoreError::InvalidToken("bad".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(CoreError::Revoked), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(CoreError::StaleCredential), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(CoreError::Forbidden("no".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(CoreError::CategoryNotFound(vec!["rust".into()])),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CoreError::Conflict(UniqueField::Email)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(CoreError::StorageError(sqlx::Error::PoolTimedOut)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(CoreError::Validation("short".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn conflict_message_names_field() {
        let e = AppError::from(CoreError::Conflict(UniqueField::Username));
        assert_eq!(e.to_string(), "Conflict: username already exists");
    }
}
