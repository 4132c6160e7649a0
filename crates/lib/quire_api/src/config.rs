//! API server configuration.

use std::time::Duration;

use quire_core::auth::TokenConfig;
use quire_core::auth::jwt::resolve_jwt_secret;
use quire_core::auth::revocation::DEFAULT_SWEEP_INTERVAL;
use quire_core::db::DEFAULT_DATABASE_URL;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3100";

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3100").
    pub bind_addr: String,
    /// SQLite connection URL.
    pub database_url: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Access/refresh token lifetimes.
    pub tokens: TokenConfig,
    /// Interval between revocation registry sweeps.
    pub sweep_interval: Duration,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                 | Default                              |
    /// |--------------------------|--------------------------------------|
    /// | `BIND_ADDR`              | `127.0.0.1:3100`                     |
    /// | `DATABASE_URL`           | `sqlite://quire.db`                  |
    /// | `QUIRE_JWT_SECRET` / `JWT_SECRET` | generated & persisted to file |
    /// | `ACCESS_TOKEN_TTL_SECS`  | `900`                                |
    /// | `REFRESH_TOKEN_TTL_SECS` | `2592000`                            |
    /// | `REVOCATION_SWEEP_SECS`  | `300`                                |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable or non-positive numbers
    /// fall back to the defaults; a missing secret is resolved from disk.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = TokenConfig::default();
        let secs = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<i64>().ok())
                .filter(|n| *n > 0)
        };

        let tokens = TokenConfig {
            access_ttl: secs("ACCESS_TOKEN_TTL_SECS")
                .map(chrono::Duration::seconds)
                .unwrap_or(defaults.access_ttl),
            refresh_ttl: secs("REFRESH_TOKEN_TTL_SECS")
                .map(chrono::Duration::seconds)
                .unwrap_or(defaults.refresh_ttl),
        };
        let sweep_interval = secs("REVOCATION_SWEEP_SECS")
            .map(|n| Duration::from_secs(n.unsigned_abs()))
            .unwrap_or(DEFAULT_SWEEP_INTERVAL);

        let jwt_secret = ["QUIRE_JWT_SECRET", "JWT_SECRET"]
            .into_iter()
            .filter_map(&lookup)
            .find(|s| !s.is_empty())
            .unwrap_or_else(resolve_jwt_secret);

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            jwt_secret,
            tokens,
            sweep_interval,
        }
    }

    /// Configuration for tests and embedding: fixed secret, default TTLs.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            database_url: "sqlite::memory:".into(),
            jwt_secret: secret.into(),
            tokens: TokenConfig::default(),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}
