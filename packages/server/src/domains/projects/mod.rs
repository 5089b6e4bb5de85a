//! Projects domain - the tenant registry
//!
//! Responsibilities:
//! - Project records (name, API key, invite code, active flag)
//! - Key and invite-code generation
//! - Resolving a caller's project from its API key

pub mod actions;
pub mod keys;
pub mod models;

pub use models::Project;
