//! Posts and their category sets.

use quire_core::auth::{Action, Resource};
use quire_core::models::{NewPost, Post, PostUpdate, TokenClaims};
use quire_core::store::posts;
use quire_core::validation;
use uuid::Uuid;

use super::gate;
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{CreatePostRequest, PostResponse, PostSummary, UpdatePostRequest};

fn post_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Post {id} not found"))
}

async fn load(state: &AppState, id: Uuid) -> AppResult<Post> {
    posts::get_post(&state.pool, id)
        .await?
        .ok_or_else(|| post_not_found(id))
}

pub async fn list_posts(state: &AppState) -> AppResult<Vec<PostSummary>> {
    let posts = posts::list_posts(&state.pool).await?;
    Ok(posts.into_iter().map(Into::into).collect())
}

pub async fn get_post(state: &AppState, claims: &TokenClaims, id: Uuid) -> AppResult<PostResponse> {
    let mut conn = state.pool.acquire().await?;
    let post = posts::get_post_with_categories(&mut conn, id)
        .await?
        .ok_or_else(|| post_not_found(id))?;
    gate(
        claims,
        &Resource::Post {
            author_id: post.post.author_id,
        },
        Action::Read,
    )?;
    Ok(post.into())
}

/// Create a post owned by the caller. Unknown category names reject the
/// whole request.
pub async fn create_post(
    state: &AppState,
    claims: &TokenClaims,
    req: &CreatePostRequest,
) -> AppResult<PostResponse> {
    gate(
        claims,
        &Resource::Post {
            author_id: claims.sub,
        },
        Action::Create,
    )?;
    validation::non_empty("title", &req.title)?;
    validation::non_empty("content", &req.content)?;

    let new = NewPost {
        title: req.title.clone(),
        content: req.content.clone(),
        category_names: req.category_names.clone(),
    };
    let created = state.coordinator.create_post(claims.sub, &new).await?;
    Ok(created.into())
}

pub async fn update_post(
    state: &AppState,
    claims: &TokenClaims,
    id: Uuid,
    req: &UpdatePostRequest,
) -> AppResult<PostResponse> {
    let post = load(state, id).await?;
    gate(
        claims,
        &Resource::Post {
            author_id: post.author_id,
        },
        Action::Update,
    )?;
    if let Some(title) = &req.title {
        validation::non_empty("title", title)?;
    }
    if let Some(content) = &req.content {
        validation::non_empty("content", content)?;
    }

    let update = PostUpdate {
        title: req.title.clone(),
        content: req.content.clone(),
        category_names: req.category_names.clone(),
    };
    let updated = state.coordinator.update_post(id, &update).await?;
    Ok(updated.into())
}

/// Delete a post together with all of its comments.
pub async fn delete_post(state: &AppState, claims: &TokenClaims, id: Uuid) -> AppResult<()> {
    let post = load(state, id).await?;
    gate(
        claims,
        &Resource::Post {
            author_id: post.author_id,
        },
        Action::Delete,
    )?;
    state.coordinator.delete_post(id).await?;
    Ok(())
}
