//! Request flows: token gate, ownership lookup, policy, then the coordinator.

pub mod auth;
pub mod categories;
pub mod comments;
pub mod posts;
pub mod users;

use quire_core::auth::jwt::ensure_fresh;
use quire_core::auth::policy::{authorize, requires_fresh};
use quire_core::auth::{Action, Resource};
use quire_core::models::TokenClaims;

use crate::error::AppResult;

/// Freshness where the action demands it, then the policy decision.
pub(crate) fn gate(claims: &TokenClaims, resource: &Resource, action: Action) -> AppResult<()> {
    if requires_fresh(resource, action) {
        ensure_fresh(claims)?;
    }
    authorize(&claims.actor(), resource, action)?;
    Ok(())
}
