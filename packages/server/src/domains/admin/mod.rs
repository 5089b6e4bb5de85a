//! Admin domain - provisioning projects from the admin's chat
//!
//! States persisted in `admin_actions.step`:
//! `awaiting_name -> awaiting_confirmation -> completed | cancelled`

pub mod actions;
pub mod machines;
pub mod models;

pub use machines::{AdminCallback, ADD_PROJECT};
pub use models::{AdminAction, AdminStep};
