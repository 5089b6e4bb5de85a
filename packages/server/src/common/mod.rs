// Common types and utilities shared across the application

pub mod entity_ids;
pub mod errors;
pub mod id;
pub mod phone;
pub mod secrets;

pub use entity_ids::*;
pub use errors::{VerifyError, VerifyResult};
pub use id::Id;
pub use phone::{normalize_phone, require_phone};
pub use secrets::constant_time_eq;
