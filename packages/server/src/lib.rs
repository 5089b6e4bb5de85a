// Telegram Verify - API Core
//
// Phone verification for third-party projects over Telegram: chats link a
// phone number through a project deep link, projects then request and verify
// one-time codes delivered to that chat over HTTP.

pub mod bot;
pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
