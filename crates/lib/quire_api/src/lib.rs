//! # quire_api
//!
//! HTTP API library for Quire.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use quire_core::auth::{RevocationRegistry, TokenService};
use quire_core::coordinator::Coordinator;
use quire_core::notify::Notifier;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{auth, categories, comments, health, posts, users};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool (reads).
    pub pool: SqlitePool,
    /// API configuration.
    pub config: ApiConfig,
    /// Token issuance and the per-request gate.
    pub tokens: TokenService,
    /// Transactional writes.
    pub coordinator: Coordinator,
    /// Registration notices.
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        config: ApiConfig,
        revocations: Arc<RevocationRegistry>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let tokens = TokenService::new(config.jwt_secret.as_bytes(), config.tokens, revocations);
        let coordinator = Coordinator::new(pool.clone());
        Self {
            pool,
            config,
            tokens,
            coordinator,
            notifier,
        }
    }
}

/// Run embedded database migrations.
pub async fn migrate(pool: &SqlitePool) -> Result<(), quire_core::db::DbError> {
    quire_core::db::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::GET_HEALTH, get(health::health_handler))
        .route(routes::POST_REGISTER, post(auth::register_handler))
        .route(routes::POST_LOGIN, post(auth::login_handler))
        .route(routes::POST_REFRESH, post(auth::refresh_handler));

    // Protected routes (require a valid access token)
    let protected = Router::new()
        .route(routes::POST_LOGOUT, post(auth::logout_handler))
        .route(routes::USERS, get(users::list_users_handler))
        .route(
            routes::USERS_ID,
            get(users::get_user_handler)
                .put(users::update_user_handler)
                .delete(users::delete_user_handler),
        )
        .route(
            routes::PATCH_USERS_ID_PASSWORD,
            patch(users::change_password_handler),
        )
        .route(routes::PATCH_USERS_ID_ROLE, patch(users::change_role_handler))
        .route(routes::GET_USERS_ID_POSTS, get(users::list_user_posts_handler))
        .route(
            routes::POSTS,
            get(posts::list_posts_handler).post(posts::create_post_handler),
        )
        .route(
            routes::POSTS_ID,
            get(posts::get_post_handler)
                .put(posts::update_post_handler)
                .delete(posts::delete_post_handler),
        )
        .route(
            routes::POSTS_ID_COMMENTS,
            get(comments::list_post_comments_handler).post(comments::create_comment_handler),
        )
        .route(
            routes::CATEGORIES,
            get(categories::list_categories_handler).post(categories::create_category_handler),
        )
        .route(
            routes::CATEGORIES_ID,
            get(categories::get_category_handler)
                .put(categories::update_category_handler)
                .delete(categories::delete_category_handler),
        )
        .route(
            routes::GET_CATEGORIES_ID_POSTS,
            get(categories::list_category_posts_handler),
        )
        .route(routes::GET_COMMENTS, get(comments::list_comments_handler))
        .route(
            routes::COMMENTS_ID,
            get(comments::get_comment_handler)
                .put(comments::update_comment_handler)
                .delete(comments::delete_comment_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .with_state(state)
}
