//! Comments and their moderation.

use quire_core::auth::jwt::ensure_fresh;
use quire_core::auth::{Action, Resource};
use quire_core::models::{CommentWithPostAuthor, TokenClaims};
use quire_core::store::{comments, posts};
use quire_core::validation;
use uuid::Uuid;

use super::gate;
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{CommentRequest, CommentResponse};

fn comment_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Comment {id} not found"))
}

async fn load(state: &AppState, id: Uuid) -> AppResult<CommentWithPostAuthor> {
    comments::get_with_post_author(&state.pool, id)
        .await?
        .ok_or_else(|| comment_not_found(id))
}

fn resource(found: &CommentWithPostAuthor) -> Resource {
    Resource::Comment {
        author_id: found.comment.author_id,
        post_author_id: found.post_author_id,
    }
}

/// Every comment across all posts.
pub async fn list_comments(
    state: &AppState,
    claims: &TokenClaims,
) -> AppResult<Vec<CommentResponse>> {
    gate(claims, &Resource::CommentDirectory, Action::Read)?;
    let comments = comments::list_comments(&state.pool).await?;
    Ok(comments.into_iter().map(Into::into).collect())
}

pub async fn list_post_comments(
    state: &AppState,
    claims: &TokenClaims,
    post_id: Uuid,
) -> AppResult<Vec<CommentResponse>> {
    let post = posts::get_post(&state.pool, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))?;
    gate(
        claims,
        &Resource::Post {
            author_id: post.author_id,
        },
        Action::Read,
    )?;
    let comments = comments::list_for_post(&state.pool, post_id).await?;
    Ok(comments.into_iter().map(Into::into).collect())
}

pub async fn get_comment(
    state: &AppState,
    claims: &TokenClaims,
    id: Uuid,
) -> AppResult<CommentResponse> {
    let found = load(state, id).await?;
    gate(claims, &resource(&found), Action::Read)?;
    Ok(found.comment.into())
}

pub async fn create_comment(
    state: &AppState,
    claims: &TokenClaims,
    post_id: Uuid,
    req: &CommentRequest,
) -> AppResult<CommentResponse> {
    let post = posts::get_post(&state.pool, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))?;
    gate(
        claims,
        &Resource::Comment {
            author_id: claims.sub,
            post_author_id: post.author_id,
        },
        Action::Create,
    )?;
    validation::comment(&req.content)?;

    let comment = state
        .coordinator
        .create_comment(post_id, claims.sub, &req.content)
        .await?;
    Ok(comment.into())
}

pub async fn update_comment(
    state: &AppState,
    claims: &TokenClaims,
    id: Uuid,
    req: &CommentRequest,
) -> AppResult<CommentResponse> {
    let found = load(state, id).await?;
    gate(claims, &resource(&found), Action::Update)?;
    validation::comment(&req.content)?;

    let comment = state.coordinator.update_comment(id, &req.content).await?;
    Ok(comment.into())
}

/// Delete a comment. Allowed for its author and the author of the post.
pub async fn delete_comment(state: &AppState, claims: &TokenClaims, id: Uuid) -> AppResult<()> {
    // Freshness belongs to the token gate and precedes the lookup.
    ensure_fresh(claims)?;
    let found = load(state, id).await?;
    gate(claims, &resource(&found), Action::Delete)?;
    state.coordinator.delete_comment(id).await?;
    Ok(())
}
