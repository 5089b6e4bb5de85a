pub mod admin_action;

pub use admin_action::{AdminAction, AdminStep};
