//! Linking domain - binds a phone number to a chat
//!
//! A chat opens `t.me/<bot>?start=<invite_code>`, which records a short-lived
//! start session. When the same chat then shares its contact, the latest
//! session decides which project the phone is linked under.

pub mod actions;
pub mod models;

pub use models::{LinkedIdentity, StartSession};
