//! Session token models.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identity::Role;
use crate::auth::policy::Actor;

/// Access tokens authorize requests; refresh tokens only mint access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: identity ID (standard JWT `sub` claim).
    pub sub: Uuid,
    /// Role snapshotted at issuance.
    pub role: Role,
    /// Unique token identifier, the revocation key.
    pub jti: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// True only for access tokens minted from a password login.
    pub fresh: bool,
    #[serde(rename = "type")]
    pub kind: TokenKind,
}

impl TokenClaims {
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// The authenticated actor these claims describe.
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.sub,
            role: self.role,
        }
    }
}

/// Access + refresh token pair returned by login.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}
