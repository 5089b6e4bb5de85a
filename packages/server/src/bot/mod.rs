//! Telegram bot surface: update mapping, chat texts and dispatch.

pub mod dispatch;
pub mod events;
pub mod messages;

pub use dispatch::handle_event;
pub use events::BotEvent;
