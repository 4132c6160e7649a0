//! Post request handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CreatePostRequest, PostResponse, PostSummary, UpdatePostRequest};
use crate::services::posts;

/// `GET /posts`
pub async fn list_posts_handler(State(state): State<AppState>) -> AppResult<Json<Vec<PostSummary>>> {
    Ok(Json(posts::list_posts(&state).await?))
}

/// `POST /posts`: create a post, optionally filed under existing categories.
pub async fn create_post_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Json(body): Json<CreatePostRequest>,
) -> AppResult<(StatusCode, Json<PostResponse>)> {
    let resp = posts::create_post(&state, &user.0, &body).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// `GET /posts/{id}`: post with its categories.
pub async fn get_post_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PostResponse>> {
    Ok(Json(posts::get_post(&state, &user.0, id).await?))
}

/// `PUT /posts/{id}`: owner or admin.
pub async fn update_post_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePostRequest>,
) -> AppResult<Json<PostResponse>> {
    Ok(Json(posts::update_post(&state, &user.0, id, &body).await?))
}

/// `DELETE /posts/{id}`: owner or admin.
pub async fn delete_post_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    posts::delete_post(&state, &user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
