//! Comment request handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CommentRequest, CommentResponse};
use crate::services::comments;

/// `GET /comments`: every comment (admin).
pub async fn list_comments_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    Ok(Json(comments::list_comments(&state, &user.0).await?))
}

/// `GET /posts/{id}/comments`
pub async fn list_post_comments_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(post_id): Path<Uuid>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    Ok(Json(comments::list_post_comments(&state, &user.0, post_id).await?))
}

/// `POST /posts/{id}/comments`
pub async fn create_comment_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(post_id): Path<Uuid>,
    Json(body): Json<CommentRequest>,
) -> AppResult<(StatusCode, Json<CommentResponse>)> {
    let resp = comments::create_comment(&state, &user.0, post_id, &body).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// `GET /comments/{id}`
pub async fn get_comment_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CommentResponse>> {
    Ok(Json(comments::get_comment(&state, &user.0, id).await?))
}

/// `PUT /comments/{id}`: comment author or admin.
pub async fn update_comment_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<CommentRequest>,
) -> AppResult<Json<CommentResponse>> {
    Ok(Json(comments::update_comment(&state, &user.0, id, &body).await?))
}

/// `DELETE /comments/{id}`: comment author, post author or admin; fresh
/// token.
pub async fn delete_comment_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    comments::delete_comment(&state, &user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
