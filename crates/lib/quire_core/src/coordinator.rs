//! Transactional units of work.
//!
//! Every public method is one logical operation and runs on exactly one
//! transaction: it either commits as a whole or is rolled back when the
//! transaction is dropped on an early `?` return. Uniqueness is never
//! pre-checked; the write itself reports `Conflict`.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::{
    Category, CategoryUpdate, Comment, Identity, IdentityUpdate, NewCategory, NewIdentity,
    NewPost, PostUpdate, PostWithCategories, Role,
};
use crate::store::{categories, comments, identities, posts};
use crate::sync;

#[derive(Debug, Clone)]
pub struct Coordinator {
    pool: SqlitePool,
}

impl Coordinator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // --- identities ---

    pub async fn create_identity(&self, new: &NewIdentity) -> CoreResult<Identity> {
        let mut tx = self.pool.begin().await?;
        let identity = identities::insert_identity(&mut *tx, new, Utc::now()).await?;
        tx.commit().await?;
        info!(user_id = %identity.id, username = %identity.username, "identity created");
        Ok(identity)
    }

    pub async fn update_identity(&self, id: Uuid, update: IdentityUpdate) -> CoreResult<Identity> {
        let update = update.normalized();
        let mut tx = self.pool.begin().await?;
        let identity = if update.is_empty() {
            identities::get_identity(&mut *tx, id).await?
        } else {
            identities::update_identity(&mut *tx, id, &update, Utc::now()).await?
        }
        .ok_or_else(|| CoreError::not_found("user"))?;
        tx.commit().await?;
        Ok(identity)
    }

    pub async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> CoreResult<()> {
        let mut tx = self.pool.begin().await?;
        if !identities::update_password_hash(&mut *tx, id, password_hash, Utc::now()).await? {
            return Err(CoreError::not_found("user"));
        }
        tx.commit().await?;
        info!(user_id = %id, "password changed");
        Ok(())
    }

    pub async fn set_role(&self, id: Uuid, role: Role) -> CoreResult<Identity> {
        let mut tx = self.pool.begin().await?;
        let identity = identities::update_role(&mut *tx, id, role, Utc::now())
            .await?
            .ok_or_else(|| CoreError::not_found("user"))?;
        tx.commit().await?;
        info!(user_id = %id, %role, "role changed");
        Ok(identity)
    }

    /// Delete an identity together with its posts, the comments on those
    /// posts, and the identity's own comments elsewhere.
    pub async fn delete_identity(&self, id: Uuid) -> CoreResult<()> {
        let mut tx = self.pool.begin().await?;
        if !identities::delete_identity(&mut *tx, id).await? {
            return Err(CoreError::not_found("user"));
        }
        tx.commit().await?;
        info!(user_id = %id, "identity deleted");
        Ok(())
    }

    // --- posts ---

    /// Create a post and attach its categories. An unknown category name
    /// aborts the whole operation; no post row survives.
    pub async fn create_post(&self, author_id: Uuid, new: &NewPost) -> CoreResult<PostWithCategories> {
        let mut tx = self.pool.begin().await?;
        let post =
            posts::insert_post(&mut *tx, author_id, &new.title, &new.content, Utc::now()).await?;
        let categories = match new.category_names.as_deref() {
            Some(names) if !names.is_empty() => {
                sync::sync_categories(&mut *tx, post.id, names).await?
            }
            _ => Vec::new(),
        };
        tx.commit().await?;
        info!(post_id = %post.id, %author_id, "post created");
        Ok(PostWithCategories { post, categories })
    }

    /// Apply a partial update. `category_names: Some(..)` replaces the
    /// category set, an empty list clearing it.
    pub async fn update_post(&self, id: Uuid, update: &PostUpdate) -> CoreResult<PostWithCategories> {
        let mut tx = self.pool.begin().await?;
        let post = posts::update_post(
            &mut *tx,
            id,
            update.title.as_deref(),
            update.content.as_deref(),
            Utc::now(),
        )
        .await?
        .ok_or_else(|| CoreError::not_found("post"))?;
        let categories = match update.category_names.as_deref() {
            Some(names) => sync::sync_categories(&mut *tx, id, names).await?,
            None => posts::categories_for_post(&mut *tx, id).await?,
        };
        tx.commit().await?;
        Ok(PostWithCategories { post, categories })
    }

    /// Delete a post with its comments and category links.
    pub async fn delete_post(&self, id: Uuid) -> CoreResult<()> {
        let mut tx = self.pool.begin().await?;
        if !posts::delete_post(&mut *tx, id).await? {
            return Err(CoreError::not_found("post"));
        }
        tx.commit().await?;
        info!(post_id = %id, "post deleted");
        Ok(())
    }

    // --- categories ---

    pub async fn create_category(&self, new: &NewCategory) -> CoreResult<Category> {
        let mut tx = self.pool.begin().await?;
        let category = categories::insert_category(&mut *tx, new, Utc::now()).await?;
        tx.commit().await?;
        info!(category_id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    pub async fn update_category(&self, id: Uuid, update: &CategoryUpdate) -> CoreResult<Category> {
        let mut tx = self.pool.begin().await?;
        let category = categories::update_category(&mut *tx, id, update)
            .await?
            .ok_or_else(|| CoreError::not_found("category"))?;
        tx.commit().await?;
        Ok(category)
    }

    /// Delete a category. Posts filed under it stay; only the links go.
    pub async fn delete_category(&self, id: Uuid) -> CoreResult<()> {
        let mut tx = self.pool.begin().await?;
        if !categories::delete_category(&mut *tx, id).await? {
            return Err(CoreError::not_found("category"));
        }
        tx.commit().await?;
        info!(category_id = %id, "category deleted");
        Ok(())
    }

    // --- comments ---

    pub async fn create_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> CoreResult<Comment> {
        // A vanished post surfaces as a foreign-key violation (`NotFound`).
        let mut tx = self.pool.begin().await?;
        let comment =
            comments::insert_comment(&mut *tx, post_id, author_id, content, Utc::now()).await?;
        tx.commit().await?;
        Ok(comment)
    }

    pub async fn update_comment(&self, id: Uuid, content: &str) -> CoreResult<Comment> {
        let mut tx = self.pool.begin().await?;
        let comment = comments::update_comment(&mut *tx, id, content)
            .await?
            .ok_or_else(|| CoreError::not_found("comment"))?;
        tx.commit().await?;
        Ok(comment)
    }

    pub async fn delete_comment(&self, id: Uuid) -> CoreResult<()> {
        let mut tx = self.pool.begin().await?;
        if !comments::delete_comment(&mut *tx, id).await? {
            return Err(CoreError::not_found("comment"));
        }
        tx.commit().await?;
        Ok(())
    }
}
