//! Linking domain actions

mod begin_session;
mod resolve_session;

pub use begin_session::begin_session;
pub use resolve_session::{resolve_session, resolve_session_at};
