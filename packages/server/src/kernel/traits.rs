// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Naming convention: Base* for trait names (e.g., BaseChatMessenger)

use anyhow::Result;
use async_trait::async_trait;
use telegram::models::Update;

// =============================================================================
// Chat Messenger Trait (Infrastructure - outbound chat delivery)
// =============================================================================

/// A button offered under a chat message; pressing it sends `data` back as a
/// callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatChoice {
    pub label: String,
    pub data: String,
}

impl ChatChoice {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

#[async_trait]
pub trait BaseChatMessenger: Send + Sync {
    /// Send a plain text message to a chat
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;

    /// Send a message with a one-time "share my phone" keyboard
    async fn request_contact(&self, chat_id: i64, text: &str, button_label: &str) -> Result<()>;

    /// Send a message with one inline button per choice
    async fn send_choices(&self, chat_id: i64, text: &str, choices: &[ChatChoice]) -> Result<()>;

    /// Acknowledge a button press with a short toast
    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<()>;
}

// =============================================================================
// Code Hasher Trait (Infrastructure - one-way OTP digests)
// =============================================================================

/// One-way digest applied to OTPs before they are stored or compared.
///
/// Must be deterministic for a given configuration: verification recomputes
/// the digest of the submitted code and compares it to the stored one.
pub trait BaseCodeHasher: Send + Sync {
    fn digest(&self, code: &str) -> String;
}

// =============================================================================
// Update Source Trait (Infrastructure - inbound chat updates)
// =============================================================================

#[async_trait]
pub trait BaseUpdateSource: Send + Sync {
    /// Long-poll for updates with `update_id >= offset`
    async fn poll(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>>;
}
