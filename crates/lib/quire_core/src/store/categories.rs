//! Category queries.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};
use uuid::Uuid;

use crate::error::CoreResult;
use crate::models::{Category, CategoryUpdate, NewCategory};
use crate::uuid::uuidv7;

pub async fn get_category<'e>(
    ex: impl SqliteExecutor<'e>,
    id: Uuid,
) -> CoreResult<Option<Category>> {
    let row = sqlx::query_as::<_, Category>(
        "SELECT id, name, description, created_at FROM categories WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

/// List all categories, sorted by name.
pub async fn list_categories<'e>(ex: impl SqliteExecutor<'e>) -> CoreResult<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>(
        "SELECT id, name, description, created_at FROM categories ORDER BY name",
    )
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

/// Resolve category names with a single query. Names that do not exist are
/// simply absent from the result.
pub async fn find_by_names<'e>(
    ex: impl SqliteExecutor<'e>,
    names: &[String],
) -> CoreResult<Vec<Category>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
        "SELECT id, name, description, created_at FROM categories WHERE name IN (",
    );
    let mut separated = qb.separated(", ");
    for name in names {
        separated.push_bind(name.as_str());
    }
    separated.push_unseparated(") ORDER BY name");

    let rows = qb.build_query_as::<Category>().fetch_all(ex).await?;
    Ok(rows)
}

pub async fn insert_category<'e>(
    ex: impl SqliteExecutor<'e>,
    new: &NewCategory,
    now: DateTime<Utc>,
) -> CoreResult<Category> {
    let row = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (id, name, description, created_at) VALUES (?, ?, ?, ?) \
         RETURNING id, name, description, created_at",
    )
    .bind(uuidv7())
    .bind(&new.name)
    .bind(new.description.as_deref())
    .bind(now)
    .fetch_one(ex)
    .await?;
    Ok(row)
}

/// Apply the set fields. `None` if the category is gone.
pub async fn update_category<'e>(
    ex: impl SqliteExecutor<'e>,
    id: Uuid,
    update: &CategoryUpdate,
) -> CoreResult<Option<Category>> {
    let (set_description, description) = match &update.description {
        Some(value) => (true, value.as_deref()),
        None => (false, None),
    };
    let row = sqlx::query_as::<_, Category>(
        "UPDATE categories SET \
             name = COALESCE(?, name), \
             description = CASE WHEN ? THEN ? ELSE description END \
         WHERE id = ? \
         RETURNING id, name, description, created_at",
    )
    .bind(update.name.as_deref())
    .bind(set_description)
    .bind(description)
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

/// Delete a category; posts keep existing, only join rows are removed.
pub async fn delete_category<'e>(ex: impl SqliteExecutor<'e>, id: Uuid) -> CoreResult<bool> {
    let result = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected() > 0)
}
