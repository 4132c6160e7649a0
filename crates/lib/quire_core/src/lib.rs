//! # quire_core
//!
//! Identity, session and authorization logic for Quire, plus the
//! relational-integrity protocol for posts, categories and comments.

pub mod auth;
pub mod coordinator;
pub mod db;
pub mod error;
pub mod models;
pub mod notify;
pub mod store;
pub mod sync;
pub mod uuid;
pub mod validation;

pub use error::{CoreError, CoreResult, UniqueField};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
