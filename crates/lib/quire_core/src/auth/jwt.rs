//! Session token issuance and verification (HS256 JWTs).
//!
//! Tokens are signed for integrity only; claims are not secret. Every
//! authenticated request passes through [`TokenService::require`].

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::{debug, info};
use uuid::Uuid;

use super::revocation::RevocationRegistry;
use crate::error::{CoreError, CoreResult};
use crate::models::{Role, TokenClaims, TokenKind, TokenPair};

/// Access token lifetime: 15 minutes.
const ACCESS_TOKEN_EXPIRY_SECS: i64 = 15 * 60;

/// Refresh token lifetime: 30 days.
const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 30;

/// Token lifetimes.
#[derive(Debug, Clone, Copy)]
pub struct TokenConfig {
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_ttl: Duration::seconds(ACCESS_TOKEN_EXPIRY_SECS),
            refresh_ttl: Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
        }
    }
}

/// Issues, parses and gates session tokens.
///
/// Cheap to clone; clones share the same revocation registry.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    config: TokenConfig,
    revocations: Arc<RevocationRegistry>,
}

impl TokenService {
    pub fn new(secret: &[u8], config: TokenConfig, revocations: Arc<RevocationRegistry>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            config,
            revocations,
        }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Mint an access token.
    pub fn issue_access(&self, subject: Uuid, role: Role, fresh: bool) -> CoreResult<String> {
        self.mint(TokenKind::Access, subject, role, fresh, Utc::now())
    }

    /// Mint a refresh token. Refresh tokens are never fresh.
    pub fn issue_refresh(&self, subject: Uuid, role: Role) -> CoreResult<String> {
        self.mint(TokenKind::Refresh, subject, role, false, Utc::now())
    }

    /// Fresh access token plus refresh token, as returned by a password login.
    pub fn issue_pair(&self, subject: Uuid, role: Role) -> CoreResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.issue_access(subject, role, true)?,
            refresh_token: self.issue_refresh(subject, role)?,
            expires_in: self.config.access_ttl.num_seconds(),
        })
    }

    pub(crate) fn mint(
        &self,
        kind: TokenKind,
        subject: Uuid,
        role: Role,
        fresh: bool,
        now: DateTime<Utc>,
    ) -> CoreResult<String> {
        let ttl = match kind {
            TokenKind::Access => self.config.access_ttl,
            TokenKind::Refresh => self.config.refresh_ttl,
        };
        let claims = TokenClaims {
            sub: subject,
            role,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            fresh,
            kind,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| CoreError::Internal(format!("jwt encode: {e}")))
    }

    /// Verify signature, structure and expiry, returning the claims.
    pub fn parse(&self, token: &str) -> CoreResult<TokenClaims> {
        decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "rejected token");
                CoreError::InvalidToken(e.to_string())
            })
    }

    /// The gate for every authenticated endpoint: a valid, unrevoked access
    /// token, fresh if `need_fresh`.
    pub fn require(&self, token: &str, need_fresh: bool) -> CoreResult<TokenClaims> {
        let claims = self.parse(token)?;
        if claims.kind != TokenKind::Access {
            return Err(CoreError::InvalidToken(
                "refresh tokens cannot authorize requests".into(),
            ));
        }
        if self.revocations.is_revoked(&claims.jti) {
            return Err(CoreError::Revoked);
        }
        if need_fresh {
            ensure_fresh(&claims)?;
        }
        Ok(claims)
    }

    /// Exchange a refresh token for a new, non-fresh access token carrying the
    /// same subject and role snapshot.
    pub fn refresh(&self, refresh_token: &str) -> CoreResult<String> {
        let claims = self.parse(refresh_token)?;
        if claims.kind != TokenKind::Refresh {
            return Err(CoreError::InvalidToken("refresh token required".into()));
        }
        if self.revocations.is_revoked(&claims.jti) {
            return Err(CoreError::Revoked);
        }
        self.issue_access(claims.sub, claims.role, false)
    }

    /// Revoke the token these claims were parsed from.
    pub fn revoke(&self, claims: &TokenClaims) {
        self.revocations.revoke(&claims.jti, claims.expires_at());
    }
}

/// Fail with [`CoreError::StaleCredential`] unless the claims are fresh.
pub fn ensure_fresh(claims: &TokenClaims) -> CoreResult<()> {
    if claims.fresh {
        Ok(())
    } else {
        Err(CoreError::StaleCredential)
    }
}

/// Resolve the JWT secret: env var `QUIRE_JWT_SECRET` → `JWT_SECRET` →
/// persisted file → newly generated (and persisted).
pub fn resolve_jwt_secret() -> String {
    for var in ["QUIRE_JWT_SECRET", "JWT_SECRET"] {
        if let Ok(secret) = std::env::var(var)
            && !secret.is_empty()
        {
            return secret;
        }
    }
    let secret_path = jwt_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path)
        && !existing.trim().is_empty()
    {
        return existing.trim().to_string();
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = secret_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::write(&secret_path, &secret);
    info!(path = %secret_path.display(), "generated new JWT secret");
    secret
}

/// Path to the persisted JWT secret file.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quire")
        .join("jwt-secret")
}
