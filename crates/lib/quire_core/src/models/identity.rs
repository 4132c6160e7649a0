//! Identity (user account) models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Closed set of roles. Policy code matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Author,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Author => "author",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "author" => Ok(Role::Author),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Stored identity, without its credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identity with password hash (for credential checks only).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IdentityWithPassword {
    #[sqlx(flatten)]
    pub identity: Identity,
    pub password_hash: String,
}

/// Registration payload. Username and email are normalized on construction.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl NewIdentity {
    pub fn new(username: &str, email: &str, password_hash: String) -> Self {
        Self {
            username: normalize(username),
            email: normalize(email),
            password_hash,
        }
    }
}

/// Partial profile update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct IdentityUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl IdentityUpdate {
    /// Lower-case whichever fields are set.
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.as_deref().map(normalize),
            email: self.email.as_deref().map(normalize),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none()
    }
}

/// Case-normalize a username or email.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
