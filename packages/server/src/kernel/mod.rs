//! Kernel module - server infrastructure and dependencies.

pub mod bot_runner;
pub mod code_hasher;
pub mod deps;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use bot_runner::{BotRunner, BotRunnerConfig};
pub use code_hasher::Sha256CodeHasher;
pub use deps::{ServerDeps, TelegramAdapter};
pub use scheduled_tasks::{run_expiry_sweep, start_scheduler, SweepStats};
pub use test_dependencies::{MockChatMessenger, SentMessage};
pub use traits::*;
