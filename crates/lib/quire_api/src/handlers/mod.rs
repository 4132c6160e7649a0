//! Request handlers.

pub mod auth;
pub mod categories;
pub mod comments;
pub mod health;
pub mod posts;
pub mod users;
