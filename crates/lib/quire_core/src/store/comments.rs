//! Comment queries.

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::models::{Comment, CommentWithPostAuthor};
use crate::uuid::uuidv7;

/// Fetch a comment with the author of its post, for moderation checks.
pub async fn get_with_post_author<'e>(
    ex: impl SqliteExecutor<'e>,
    id: Uuid,
) -> CoreResult<Option<CommentWithPostAuthor>> {
    let row = sqlx::query_as::<_, CommentWithPostAuthor>(
        "SELECT c.id, c.content, c.post_id, c.author_id, c.created_at, \
                p.author_id AS post_author_id \
         FROM comments c \
         JOIN posts p ON p.id = c.post_id \
         WHERE c.id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

/// Comments on one post, oldest first.
pub async fn list_for_post<'e>(
    ex: impl SqliteExecutor<'e>,
    post_id: Uuid,
) -> CoreResult<Vec<Comment>> {
    let rows = sqlx::query_as::<_, Comment>(
        "SELECT id, content, post_id, author_id, created_at \
         FROM comments WHERE post_id = ? ORDER BY created_at, id",
    )
    .bind(post_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

/// Every comment in the store, oldest first.
pub async fn list_comments<'e>(ex: impl SqliteExecutor<'e>) -> CoreResult<Vec<Comment>> {
    let rows = sqlx::query_as::<_, Comment>(
        "SELECT id, content, post_id, author_id, created_at FROM comments ORDER BY created_at, id",
    )
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

/// Insert a comment. A missing post or author surfaces as `NotFound` via the
/// foreign-key check.
pub async fn insert_comment<'e>(
    ex: impl SqliteExecutor<'e>,
    post_id: Uuid,
    author_id: Uuid,
    content: &str,
    now: DateTime<Utc>,
) -> CoreResult<Comment> {
    let row = sqlx::query_as::<_, Comment>(
        "INSERT INTO comments (id, content, post_id, author_id, created_at) \
         VALUES (?, ?, ?, ?, ?) \
         RETURNING id, content, post_id, author_id, created_at",
    )
    .bind(uuidv7())
    .bind(content)
    .bind(post_id)
    .bind(author_id)
    .bind(now)
    .fetch_one(ex)
    .await?;
    Ok(row)
}

pub async fn update_comment<'e>(
    ex: impl SqliteExecutor<'e>,
    id: Uuid,
    content: &str,
) -> CoreResult<Option<Comment>> {
    let row = sqlx::query_as::<_, Comment>(
        "UPDATE comments SET content = ? WHERE id = ? \
         RETURNING id, content, post_id, author_id, created_at",
    )
    .bind(content)
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn delete_comment<'e>(ex: impl SqliteExecutor<'e>, id: Uuid) -> CoreResult<bool> {
    let result = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected() > 0)
}
