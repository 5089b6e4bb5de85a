//! Typed view of the Telegram updates the bot reacts to.

use telegram::models::{Message, Update};

/// One incoming chat event, already stripped of Bot API noise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotEvent {
    /// `/start [payload]`; the payload is the invite code of a deep link
    Start {
        chat_id: i64,
        payload: Option<String>,
    },
    AddProject {
        chat_id: i64,
        from_id: i64,
    },
    /// A shared contact card
    Contact {
        chat_id: i64,
        from_id: i64,
        contact_user_id: Option<i64>,
        phone: String,
        username: String,
    },
    Text {
        chat_id: i64,
        from_id: i64,
        text: String,
    },
    Callback {
        query_id: String,
        chat_id: i64,
        from_id: i64,
        data: String,
    },
}

impl BotEvent {
    /// Map an update to an event. Updates from bots, without a sender, or of
    /// kinds the bot does not handle yield `None`.
    pub fn from_update(update: &Update) -> Option<Self> {
        if let Some(query) = &update.callback_query {
            if query.from.is_bot {
                return None;
            }
            return Some(Self::Callback {
                query_id: query.id.clone(),
                chat_id: query.message.as_ref()?.chat.id,
                from_id: query.from.id,
                data: query.data.clone().unwrap_or_default(),
            });
        }

        update.message.as_ref().and_then(Self::from_message)
    }

    fn from_message(message: &Message) -> Option<Self> {
        let chat_id = message.chat.id;
        let from = message.from.as_ref().filter(|user| !user.is_bot)?;

        if let Some(contact) = &message.contact {
            return Some(Self::Contact {
                chat_id,
                from_id: from.id,
                contact_user_id: contact.user_id,
                phone: contact.phone_number.clone(),
                username: from.username.clone().unwrap_or_default(),
            });
        }

        let text = message.text.as_deref()?;
        let mut words = text.split_whitespace();
        match words.next().map(command_name) {
            Some("/start") => Some(Self::Start {
                chat_id,
                payload: words.next().map(str::to_string),
            }),
            Some("/add_project") => Some(Self::AddProject {
                chat_id,
                from_id: from.id,
            }),
            _ => Some(Self::Text {
                chat_id,
                from_id: from.id,
                text: text.to_string(),
            }),
        }
    }

    pub fn chat_id(&self) -> i64 {
        match self {
            Self::Start { chat_id, .. }
            | Self::AddProject { chat_id, .. }
            | Self::Contact { chat_id, .. }
            | Self::Text { chat_id, .. }
            | Self::Callback { chat_id, .. } => *chat_id,
        }
    }
}

/// `/start@my_bot` -> `/start`
fn command_name(word: &str) -> &str {
    match word.split_once('@') {
        Some((command, _)) if command.starts_with('/') => command,
        _ => word,
    }
}
