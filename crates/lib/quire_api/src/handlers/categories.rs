//! Category request handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CategoryResponse, CreateCategoryRequest, PostSummary, UpdateCategoryRequest};
use crate::services::categories;

/// `GET /categories`
pub async fn list_categories_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<CategoryResponse>>> {
    Ok(Json(categories::list_categories(&state, &user.0).await?))
}

/// `POST /categories`: admin, fresh token.
pub async fn create_category_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Json(body): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<CategoryResponse>)> {
    let resp = categories::create_category(&state, &user.0, &body).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// `GET /categories/{id}`
pub async fn get_category_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CategoryResponse>> {
    Ok(Json(categories::get_category(&state, &user.0, id).await?))
}

/// `GET /categories/{id}/posts`
pub async fn list_category_posts_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<PostSummary>>> {
    Ok(Json(categories::list_category_posts(&state, &user.0, id).await?))
}

/// `PUT /categories/{id}`: admin, fresh token.
pub async fn update_category_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCategoryRequest>,
) -> AppResult<Json<CategoryResponse>> {
    Ok(Json(categories::update_category(&state, &user.0, id, &body).await?))
}

/// `DELETE /categories/{id}`: admin, fresh token.
pub async fn delete_category_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    categories::delete_category(&state, &user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
