//! Single-statement queries per entity kind.
//!
//! Read helpers accept any executor (pool or transaction). Multi-statement
//! units live in [`crate::coordinator`], which runs these helpers on one
//! transaction.

pub mod categories;
pub mod comments;
pub mod identities;
pub mod posts;
