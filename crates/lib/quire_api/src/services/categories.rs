//! Category administration.

use quire_core::auth::{Action, Resource};
use quire_core::models::{CategoryUpdate, NewCategory, TokenClaims};
use quire_core::store::{categories, posts};
use quire_core::validation;
use uuid::Uuid;

use super::gate;
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{
    CategoryResponse, CreateCategoryRequest, PostSummary, UpdateCategoryRequest,
};

fn category_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Category {id} not found"))
}

pub async fn list_categories(
    state: &AppState,
    claims: &TokenClaims,
) -> AppResult<Vec<CategoryResponse>> {
    gate(claims, &Resource::Category, Action::Read)?;
    let categories = categories::list_categories(&state.pool).await?;
    Ok(categories.into_iter().map(Into::into).collect())
}

pub async fn get_category(
    state: &AppState,
    claims: &TokenClaims,
    id: Uuid,
) -> AppResult<CategoryResponse> {
    gate(claims, &Resource::Category, Action::Read)?;
    let category = categories::get_category(&state.pool, id)
        .await?
        .ok_or_else(|| category_not_found(id))?;
    Ok(category.into())
}

/// Posts filed under a category.
pub async fn list_category_posts(
    state: &AppState,
    claims: &TokenClaims,
    id: Uuid,
) -> AppResult<Vec<PostSummary>> {
    gate(claims, &Resource::Category, Action::Read)?;
    if categories::get_category(&state.pool, id).await?.is_none() {
        return Err(category_not_found(id));
    }
    let posts = posts::list_posts_in_category(&state.pool, id).await?;
    Ok(posts.into_iter().map(Into::into).collect())
}

pub async fn create_category(
    state: &AppState,
    claims: &TokenClaims,
    req: &CreateCategoryRequest,
) -> AppResult<CategoryResponse> {
    gate(claims, &Resource::Category, Action::Create)?;
    validation::non_empty("name", &req.name)?;

    let new = NewCategory {
        name: req.name.trim().to_string(),
        description: req.description.clone(),
    };
    let category = state.coordinator.create_category(&new).await?;
    Ok(category.into())
}

pub async fn update_category(
    state: &AppState,
    claims: &TokenClaims,
    id: Uuid,
    req: &UpdateCategoryRequest,
) -> AppResult<CategoryResponse> {
    gate(claims, &Resource::Category, Action::Update)?;
    if let Some(name) = &req.name {
        validation::non_empty("name", name)?;
    }

    let update = CategoryUpdate {
        name: req.name.as_deref().map(|n| n.trim().to_string()),
        description: req.description.clone(),
    };
    let category = state.coordinator.update_category(id, &update).await?;
    Ok(category.into())
}

/// Delete a category. Posts filed under it are kept.
pub async fn delete_category(state: &AppState, claims: &TokenClaims, id: Uuid) -> AppResult<()> {
    gate(claims, &Resource::Category, Action::Delete)?;
    state.coordinator.delete_category(id).await?;
    Ok(())
}
