// TestDependencies - mock implementations for testing
//
// Provides a recording chat messenger that can be injected into ServerDeps.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::{BaseChatMessenger, ChatChoice};

/// One outbound chat call captured by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMessage {
    Text {
        chat_id: i64,
        text: String,
    },
    ContactRequest {
        chat_id: i64,
        text: String,
    },
    Choices {
        chat_id: i64,
        text: String,
        choices: Vec<ChatChoice>,
    },
    CallbackAnswer {
        callback_id: String,
        text: String,
    },
}

impl SentMessage {
    pub fn chat_id(&self) -> Option<i64> {
        match self {
            Self::Text { chat_id, .. }
            | Self::ContactRequest { chat_id, .. }
            | Self::Choices { chat_id, .. } => Some(*chat_id),
            Self::CallbackAnswer { .. } => None,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Text { text, .. }
            | Self::ContactRequest { text, .. }
            | Self::Choices { text, .. }
            | Self::CallbackAnswer { text, .. } => text,
        }
    }
}

// =============================================================================
// Mock Chat Messenger
// =============================================================================

#[derive(Clone, Default)]
pub struct MockChatMessenger {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    fail_deliveries: Arc<AtomicBool>,
}

impl MockChatMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail, as if the chat were unreachable.
    pub fn fail_deliveries(&self, fail: bool) {
        self.fail_deliveries.store(fail, Ordering::SeqCst);
    }

    /// All calls recorded so far
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Messages delivered to a chat (callback answers excluded)
    pub fn sent_to(&self, chat_id: i64) -> Vec<SentMessage> {
        self.sent()
            .into_iter()
            .filter(|m| m.chat_id() == Some(chat_id))
            .collect()
    }

    pub fn last_to(&self, chat_id: i64) -> Option<SentMessage> {
        self.sent_to(chat_id).pop()
    }

    /// Pull the six-digit code out of the last OTP message sent to a chat.
    pub fn last_code_sent_to(&self, chat_id: i64) -> Option<String> {
        self.sent_to(chat_id).iter().rev().find_map(|m| {
            m.text()
                .split(|c: char| !c.is_ascii_digit())
                .find(|token| token.len() == 6)
                .map(str::to_string)
        })
    }

    fn record(&self, message: SentMessage) -> Result<()> {
        if self.fail_deliveries.load(Ordering::SeqCst) {
            anyhow::bail!("chat unreachable");
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

#[async_trait]
impl BaseChatMessenger for MockChatMessenger {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.record(SentMessage::Text {
            chat_id,
            text: text.to_string(),
        })
    }

    async fn request_contact(&self, chat_id: i64, text: &str, _button_label: &str) -> Result<()> {
        self.record(SentMessage::ContactRequest {
            chat_id,
            text: text.to_string(),
        })
    }

    async fn send_choices(&self, chat_id: i64, text: &str, choices: &[ChatChoice]) -> Result<()> {
        self.record(SentMessage::Choices {
            chat_id,
            text: text.to_string(),
            choices: choices.to_vec(),
        })
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<()> {
        self.record(SentMessage::CallbackAnswer {
            callback_id: callback_id.to_string(),
            text: text.to_string(),
        })
    }
}
