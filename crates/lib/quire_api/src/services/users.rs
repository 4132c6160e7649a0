//! Identity management.

use quire_core::auth::password::{hash_password, verify_password};
use quire_core::auth::{Action, Resource};
use quire_core::models::{IdentityUpdate, TokenClaims};
use quire_core::store::{identities, posts};
use quire_core::validation;
use uuid::Uuid;

use super::gate;
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{
    ChangePasswordRequest, ChangeRoleRequest, MessageResponse, PostSummary, UpdateUserRequest,
    UserResponse,
};

fn user_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("User {id} not found"))
}

pub async fn list_users(state: &AppState, claims: &TokenClaims) -> AppResult<Vec<UserResponse>> {
    gate(claims, &Resource::IdentityDirectory, Action::Read)?;
    let users = identities::list_identities(&state.pool).await?;
    Ok(users.into_iter().map(Into::into).collect())
}

pub async fn get_user(state: &AppState, claims: &TokenClaims, id: Uuid) -> AppResult<UserResponse> {
    gate(claims, &Resource::Identity { id }, Action::Read)?;
    let user = identities::get_identity(&state.pool, id)
        .await?
        .ok_or_else(|| user_not_found(id))?;
    Ok(user.into())
}

pub async fn update_user(
    state: &AppState,
    claims: &TokenClaims,
    id: Uuid,
    req: &UpdateUserRequest,
) -> AppResult<UserResponse> {
    gate(claims, &Resource::Identity { id }, Action::Update)?;
    if let Some(username) = &req.username {
        validation::username(username)?;
    }
    if let Some(email) = &req.email {
        validation::email(email)?;
    }

    let update = IdentityUpdate {
        username: req.username.clone(),
        email: req.email.clone(),
    };
    let user = state.coordinator.update_identity(id, update).await?;
    Ok(user.into())
}

/// Change the caller's password after re-verifying the old one.
pub async fn change_password(
    state: &AppState,
    claims: &TokenClaims,
    id: Uuid,
    req: &ChangePasswordRequest,
) -> AppResult<MessageResponse> {
    gate(claims, &Resource::Identity { id }, Action::ChangePassword)?;
    let stored = identities::get_with_password(&state.pool, id)
        .await?
        .ok_or_else(|| user_not_found(id))?;
    if !verify_password(&req.old_password, &stored.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }
    validation::password(&req.new_password)?;

    let password_hash = hash_password(&req.new_password)?;
    state.coordinator.set_password_hash(id, &password_hash).await?;
    Ok(MessageResponse::new("Password changed successfully"))
}

/// Change a user's role. Tokens already issued keep their role snapshot
/// until they expire.
pub async fn change_role(
    state: &AppState,
    claims: &TokenClaims,
    id: Uuid,
    req: &ChangeRoleRequest,
) -> AppResult<UserResponse> {
    gate(claims, &Resource::Identity { id }, Action::ChangeRole)?;
    let user = state.coordinator.set_role(id, req.role).await?;
    Ok(user.into())
}

/// Delete a user with everything they own. Deleting yourself also revokes
/// the token used for the request.
pub async fn delete_user(state: &AppState, claims: &TokenClaims, id: Uuid) -> AppResult<()> {
    gate(claims, &Resource::Identity { id }, Action::Delete)?;
    state.coordinator.delete_identity(id).await?;
    if claims.sub == id {
        state.tokens.revoke(claims);
    }
    Ok(())
}

pub async fn list_user_posts(
    state: &AppState,
    claims: &TokenClaims,
    id: Uuid,
) -> AppResult<Vec<PostSummary>> {
    let author = identities::get_identity(&state.pool, id)
        .await?
        .ok_or_else(|| user_not_found(id))?;
    gate(
        claims,
        &Resource::Post {
            author_id: author.id,
        },
        Action::Read,
    )?;
    let posts = posts::list_posts_by_author(&state.pool, id).await?;
    Ok(posts.into_iter().map(Into::into).collect())
}
