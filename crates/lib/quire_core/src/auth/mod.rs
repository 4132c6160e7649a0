//! Authentication and authorization logic.
//!
//! Provides password hashing, session token management, the revocation
//! registry and the role/ownership policy shared by every API flow.

pub mod jwt;
pub mod password;
pub mod policy;
pub mod revocation;

pub use jwt::{TokenConfig, TokenService};
pub use policy::{Action, Actor, Decision, Resource};
pub use revocation::RevocationRegistry;
