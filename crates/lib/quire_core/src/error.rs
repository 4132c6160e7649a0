//! Domain error taxonomy and storage error translation.
//!
//! Every core operation fails with exactly one [`CoreError`] kind. Storage
//! failures are classified once, in the `From<sqlx::Error>` impl, so callers
//! can use `?` on any query and still get `Conflict` / `NotFound` /
//! `StorageError` as appropriate.

use std::fmt;

use sqlx::error::DatabaseError;
use thiserror::Error;

/// Result alias used across the core.
pub type CoreResult<T> = Result<T, CoreError>;

/// Field whose uniqueness constraint was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
    CategoryName,
}

impl UniqueField {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueField::Username => "username",
            UniqueField::Email => "email",
            UniqueField::CategoryName => "category name",
        }
    }

    /// Identify the violated field from a store error.
    ///
    /// SQLite reports no constraint name, only a message such as
    /// `UNIQUE constraint failed: users.username`.
    fn from_violation(err: &dyn DatabaseError) -> Option<Self> {
        let detail = err
            .constraint()
            .map(str::to_owned)
            .unwrap_or_else(|| err.message().to_owned());

        if detail.contains("users") && detail.contains("username") {
            Some(UniqueField::Username)
        } else if detail.contains("users") && detail.contains("email") {
            Some(UniqueField::Email)
        } else if detail.contains("categories") && detail.contains("name") {
            Some(UniqueField::CategoryName)
        } else {
            None
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core error kinds.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed, mis-signed, expired, or wrong-kind token.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has been revoked")]
    Revoked,

    /// Valid token, but not fresh enough for the requested action.
    #[error("Fresh token required")]
    StaleCredential,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Categories not found: {}", .0.join(", "))]
    CategoryNotFound(Vec<String>),

    #[error("Conflict: {0} already exists")]
    Conflict(UniqueField),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    StorageError(#[source] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a missing entity of the given kind.
    pub fn not_found(what: impl fmt::Display) -> Self {
        CoreError::NotFound(what.to_string())
    }
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = err {
            return CoreError::NotFound("row".into());
        }
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation()
                && let Some(field) = UniqueField::from_violation(&**db_err)
            {
                return CoreError::Conflict(field);
            }
            if db_err.is_foreign_key_violation() {
                return CoreError::NotFound("referenced record".into());
            }
        }
        CoreError::StorageError(err)
    }
}
