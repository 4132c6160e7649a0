//! Post queries.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqliteExecutor};
use uuid::Uuid;

use crate::error::CoreResult;
use crate::models::{Category, Post, PostWithCategories};
use crate::uuid::uuidv7;

pub async fn get_post<'e>(ex: impl SqliteExecutor<'e>, id: Uuid) -> CoreResult<Option<Post>> {
    let row = sqlx::query_as::<_, Post>(
        "SELECT id, title, content, author_id, created_at, updated_at FROM posts WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

/// Current categories of a post, sorted by name.
pub async fn categories_for_post<'e>(
    ex: impl SqliteExecutor<'e>,
    post_id: Uuid,
) -> CoreResult<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>(
        "SELECT c.id, c.name, c.description, c.created_at \
         FROM categories c \
         JOIN post_categories pc ON pc.category_id = c.id \
         WHERE pc.post_id = ? \
         ORDER BY c.name",
    )
    .bind(post_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

/// Fetch a post together with its categories.
pub async fn get_post_with_categories(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> CoreResult<Option<PostWithCategories>> {
    let Some(post) = get_post(&mut *conn, id).await? else {
        return Ok(None);
    };
    let categories = categories_for_post(&mut *conn, id).await?;
    Ok(Some(PostWithCategories { post, categories }))
}

/// List all posts, newest first.
pub async fn list_posts<'e>(ex: impl SqliteExecutor<'e>) -> CoreResult<Vec<Post>> {
    let rows = sqlx::query_as::<_, Post>(
        "SELECT id, title, content, author_id, created_at, updated_at \
         FROM posts ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

/// List posts by one author, newest first.
pub async fn list_posts_by_author<'e>(
    ex: impl SqliteExecutor<'e>,
    author_id: Uuid,
) -> CoreResult<Vec<Post>> {
    let rows = sqlx::query_as::<_, Post>(
        "SELECT id, title, content, author_id, created_at, updated_at \
         FROM posts WHERE author_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(author_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

/// List posts filed under a category, newest first.
pub async fn list_posts_in_category<'e>(
    ex: impl SqliteExecutor<'e>,
    category_id: Uuid,
) -> CoreResult<Vec<Post>> {
    let rows = sqlx::query_as::<_, Post>(
        "SELECT p.id, p.title, p.content, p.author_id, p.created_at, p.updated_at \
         FROM posts p \
         JOIN post_categories pc ON pc.post_id = p.id \
         WHERE pc.category_id = ? \
         ORDER BY p.created_at DESC, p.id DESC",
    )
    .bind(category_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn insert_post<'e>(
    ex: impl SqliteExecutor<'e>,
    author_id: Uuid,
    title: &str,
    content: &str,
    now: DateTime<Utc>,
) -> CoreResult<Post> {
    let row = sqlx::query_as::<_, Post>(
        "INSERT INTO posts (id, title, content, author_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?) \
         RETURNING id, title, content, author_id, created_at, updated_at",
    )
    .bind(uuidv7())
    .bind(title)
    .bind(content)
    .bind(author_id)
    .bind(now)
    .bind(now)
    .fetch_one(ex)
    .await?;
    Ok(row)
}

/// Apply the set fields and bump `updated_at`. `None` if the post is gone.
pub async fn update_post<'e>(
    ex: impl SqliteExecutor<'e>,
    id: Uuid,
    title: Option<&str>,
    content: Option<&str>,
    now: DateTime<Utc>,
) -> CoreResult<Option<Post>> {
    let row = sqlx::query_as::<_, Post>(
        "UPDATE posts SET \
             title = COALESCE(?, title), \
             content = COALESCE(?, content), \
             updated_at = ? \
         WHERE id = ? \
         RETURNING id, title, content, author_id, created_at, updated_at",
    )
    .bind(title)
    .bind(content)
    .bind(now)
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

/// Delete a post; its comments and join rows go with it.
pub async fn delete_post<'e>(ex: impl SqliteExecutor<'e>, id: Uuid) -> CoreResult<bool> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected() > 0)
}
