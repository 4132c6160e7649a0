//! Replace-all synchronization of a post's category set.
//!
//! Names are resolved with one lookup. If any name is unknown the sync fails
//! with [`CoreError::CategoryNotFound`] before touching the join relation, so
//! the caller's transaction never observes a partially applied set.

use std::collections::BTreeSet;

use sqlx::SqliteConnection;
use tracing::debug;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::Category;
use crate::store::categories;

/// Trimmed, deduplicated names in sorted order.
fn distinct(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|n| n.trim().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Resolve every name to a category, or fail naming all that are missing.
pub async fn resolve_categories(
    conn: &mut SqliteConnection,
    names: &[String],
) -> CoreResult<Vec<Category>> {
    let wanted = distinct(names);
    let found = categories::find_by_names(&mut *conn, &wanted).await?;
    if found.len() == wanted.len() {
        return Ok(found);
    }

    let known: BTreeSet<&str> = found.iter().map(|c| c.name.as_str()).collect();
    let missing: Vec<String> = wanted
        .into_iter()
        .filter(|name| !known.contains(name.as_str()))
        .collect();
    Err(CoreError::CategoryNotFound(missing))
}

/// Make `names` the exact category set of `post_id`.
///
/// Must run inside the caller's transaction. An empty slice clears the set.
pub async fn sync_categories(
    conn: &mut SqliteConnection,
    post_id: Uuid,
    names: &[String],
) -> CoreResult<Vec<Category>> {
    let resolved = resolve_categories(&mut *conn, names).await?;

    sqlx::query("DELETE FROM post_categories WHERE post_id = ?")
        .bind(post_id)
        .execute(&mut *conn)
        .await?;

    for category in &resolved {
        sqlx::query("INSERT INTO post_categories (post_id, category_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(category.id)
            .execute(&mut *conn)
            .await?;
    }

    debug!(%post_id, count = resolved.len(), "synchronized post categories");
    Ok(resolved)
}
