//! Identity queries.

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::models::identity::normalize;
use crate::models::{Identity, IdentityUpdate, IdentityWithPassword, NewIdentity, Role};
use crate::uuid::uuidv7;

/// Fetch an identity by ID.
pub async fn get_identity<'e>(ex: impl SqliteExecutor<'e>, id: Uuid) -> CoreResult<Option<Identity>> {
    let row = sqlx::query_as::<_, Identity>(
        "SELECT id, username, email, role, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

/// Fetch an identity with its password hash by ID.
pub async fn get_with_password<'e>(
    ex: impl SqliteExecutor<'e>,
    id: Uuid,
) -> CoreResult<Option<IdentityWithPassword>> {
    let row = sqlx::query_as::<_, IdentityWithPassword>(
        "SELECT id, username, email, role, created_at, updated_at, password_hash \
         FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

/// Look up an identity for login by username or email (case-normalized).
///
/// A username match wins over an email match.
pub async fn find_by_login<'e>(
    ex: impl SqliteExecutor<'e>,
    login: &str,
) -> CoreResult<Option<IdentityWithPassword>> {
    let login = normalize(login);
    let row = sqlx::query_as::<_, IdentityWithPassword>(
        "SELECT id, username, email, role, created_at, updated_at, password_hash \
         FROM users WHERE username = ? OR email = ? \
         ORDER BY CASE WHEN username = ? THEN 0 ELSE 1 END LIMIT 1",
    )
    .bind(&login)
    .bind(&login)
    .bind(&login)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

/// Fetch an identity by (case-normalized) username.
pub async fn find_by_username<'e>(
    ex: impl SqliteExecutor<'e>,
    username: &str,
) -> CoreResult<Option<Identity>> {
    let row = sqlx::query_as::<_, Identity>(
        "SELECT id, username, email, role, created_at, updated_at FROM users WHERE username = ?",
    )
    .bind(normalize(username))
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

/// List all identities, oldest first.
pub async fn list_identities<'e>(ex: impl SqliteExecutor<'e>) -> CoreResult<Vec<Identity>> {
    let rows = sqlx::query_as::<_, Identity>(
        "SELECT id, username, email, role, created_at, updated_at FROM users ORDER BY created_at, id",
    )
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

/// Insert a new identity with the default role.
pub async fn insert_identity<'e>(
    ex: impl SqliteExecutor<'e>,
    new: &NewIdentity,
    now: DateTime<Utc>,
) -> CoreResult<Identity> {
    let row = sqlx::query_as::<_, Identity>(
        "INSERT INTO users (id, username, email, password_hash, role, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) \
         RETURNING id, username, email, role, created_at, updated_at",
    )
    .bind(uuidv7())
    .bind(&new.username)
    .bind(&new.email)
    .bind(&new.password_hash)
    .bind(Role::default().as_str())
    .bind(now)
    .bind(now)
    .fetch_one(ex)
    .await?;
    Ok(row)
}

/// Apply the set fields of a profile update. `None` if the identity is gone.
pub async fn update_identity<'e>(
    ex: impl SqliteExecutor<'e>,
    id: Uuid,
    update: &IdentityUpdate,
    now: DateTime<Utc>,
) -> CoreResult<Option<Identity>> {
    let row = sqlx::query_as::<_, Identity>(
        "UPDATE users SET \
             username = COALESCE(?, username), \
             email = COALESCE(?, email), \
             updated_at = ? \
         WHERE id = ? \
         RETURNING id, username, email, role, created_at, updated_at",
    )
    .bind(update.username.as_deref())
    .bind(update.email.as_deref())
    .bind(now)
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

/// Replace the password hash. Returns false if the identity is gone.
pub async fn update_password_hash<'e>(
    ex: impl SqliteExecutor<'e>,
    id: Uuid,
    password_hash: &str,
    now: DateTime<Utc>,
) -> CoreResult<bool> {
    let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(password_hash)
        .bind(now)
        .bind(id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Set the role of an identity. `None` if the identity is gone.
pub async fn update_role<'e>(
    ex: impl SqliteExecutor<'e>,
    id: Uuid,
    role: Role,
    now: DateTime<Utc>,
) -> CoreResult<Option<Identity>> {
    let row = sqlx::query_as::<_, Identity>(
        "UPDATE users SET role = ?, updated_at = ? WHERE id = ? \
         RETURNING id, username, email, role, created_at, updated_at",
    )
    .bind(role.as_str())
    .bind(now)
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

/// Delete an identity; posts and comments go with it via cascades.
pub async fn delete_identity<'e>(ex: impl SqliteExecutor<'e>, id: Uuid) -> CoreResult<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected() > 0)
}
