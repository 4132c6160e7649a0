//! Domain models.
//!
//! Row types map one-to-one onto the tables in `migrations/`; update payloads
//! carry only the fields a caller asked to change.

pub mod auth;
pub mod content;
pub mod identity;

pub use auth::{TokenClaims, TokenKind, TokenPair};
pub use content::{
    Category, CategoryUpdate, Comment, CommentWithPostAuthor, NewCategory, NewPost, Post,
    PostUpdate, PostWithCategories,
};
pub use identity::{Identity, IdentityUpdate, IdentityWithPassword, NewIdentity, Role};
