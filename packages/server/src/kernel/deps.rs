//! Server dependencies for domain actions (using traits for testability)
//!
//! This module provides the central dependency container used by the HTTP
//! handlers, the bot dispatcher and the background jobs. External services
//! sit behind traits so tests can swap in recording doubles.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use telegram::models::{ReplyMarkup, Update};
use telegram::TelegramService;

use crate::config::VerificationPolicy;
use crate::kernel::{BaseChatMessenger, BaseCodeHasher, BaseUpdateSource, ChatChoice};

// =============================================================================
// TelegramService Adapter (implements the chat traits)
// =============================================================================

/// Wrapper around TelegramService that implements BaseChatMessenger and
/// BaseUpdateSource
pub struct TelegramAdapter(pub Arc<TelegramService>);

impl TelegramAdapter {
    pub fn new(service: Arc<TelegramService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseChatMessenger for TelegramAdapter {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.0.send_message(chat_id, text, None).await?;
        Ok(())
    }

    async fn request_contact(&self, chat_id: i64, text: &str, button_label: &str) -> Result<()> {
        let markup = ReplyMarkup::contact_request(button_label);
        self.0.send_message(chat_id, text, Some(markup)).await?;
        Ok(())
    }

    async fn send_choices(&self, chat_id: i64, text: &str, choices: &[ChatChoice]) -> Result<()> {
        let markup = ReplyMarkup::inline_rows(
            choices
                .iter()
                .map(|choice| (choice.label.as_str(), choice.data.as_str())),
        );
        self.0.send_message(chat_id, text, Some(markup)).await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<()> {
        self.0.answer_callback_query(callback_id, text).await?;
        Ok(())
    }
}

#[async_trait]
impl BaseUpdateSource for TelegramAdapter {
    async fn poll(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        Ok(self.0.get_updates(offset, timeout_secs).await?)
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to actions (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub messenger: Arc<dyn BaseChatMessenger>,
    pub code_hasher: Arc<dyn BaseCodeHasher>,
    pub policy: VerificationPolicy,
    /// Telegram user id allowed to run admin commands, if any.
    pub admin_telegram_id: Option<i64>,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        db_pool: PgPool,
        messenger: Arc<dyn BaseChatMessenger>,
        code_hasher: Arc<dyn BaseCodeHasher>,
        policy: VerificationPolicy,
        admin_telegram_id: Option<i64>,
    ) -> Self {
        Self {
            db_pool,
            messenger,
            code_hasher,
            policy,
            admin_telegram_id,
        }
    }

    /// Whether a Telegram user may drive the admin conversation.
    pub fn is_admin(&self, telegram_user_id: i64) -> bool {
        self.admin_telegram_id == Some(telegram_user_id)
    }
}
