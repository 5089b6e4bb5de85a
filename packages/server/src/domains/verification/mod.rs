//! Verification domain - one-time codes over the linked chat
//!
//! Responsibilities:
//! - Issuing codes to the chat linked to (project, phone)
//! - Verifying submissions with expiry, attempt limit and single use
//! - Direct code delivery to a known chat id

pub mod actions;
pub mod machines;
pub mod models;

pub use machines::{check_code, CodeCheck};
pub use models::VerificationCode;
