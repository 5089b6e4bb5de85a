//! Verification domain actions
//!
//! Called directly from the `/auth/*` and `/notify` handlers.

mod is_linked;
mod issue_code;
mod notify;
mod verify_code;

pub use is_linked::is_linked;
pub use issue_code::{code_message, issue_code};
pub use notify::{notify, notify_message};
pub use verify_code::{verify_code, verify_code_at};
