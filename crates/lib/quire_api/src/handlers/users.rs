//! User request handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    ChangePasswordRequest, ChangeRoleRequest, MessageResponse, PostSummary, UpdateUserRequest,
    UserResponse,
};
use crate::services::users;

/// `GET /users`: list all users (admin).
pub async fn list_users_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<UserResponse>>> {
    Ok(Json(users::list_users(&state, &user.0).await?))
}

/// `GET /users/{id}`
pub async fn get_user_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(users::get_user(&state, &user.0, id).await?))
}

/// `PUT /users/{id}`: update username and/or email. Fresh token required.
pub async fn update_user_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(users::update_user(&state, &user.0, id, &body).await?))
}

/// `DELETE /users/{id}`: delete a user and everything they own. Fresh token
/// required.
pub async fn delete_user_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    users::delete_user(&state, &user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /users/{id}/password`
pub async fn change_password_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    Ok(Json(users::change_password(&state, &user.0, id, &body).await?))
}

/// `PATCH /users/{id}/role`: admin only.
pub async fn change_role_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<ChangeRoleRequest>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(users::change_role(&state, &user.0, id, &body).await?))
}

/// `GET /users/{id}/posts`
pub async fn list_user_posts_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<PostSummary>>> {
    Ok(Json(users::list_user_posts(&state, &user.0, id).await?))
}
