use serde::Deserialize;

/// A body field clients send either as a JSON string or a JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScalarInput {
    Number(serde_json::Number),
    Text(String),
}

impl ScalarInput {
    /// The field as text; numbers render the way they were written.
    pub fn to_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(raw) => raw.clone(),
        }
    }

    /// Telegram chat ids are signed 64-bit integers.
    pub fn to_chat_id(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            Self::Text(raw) => raw.trim().parse().ok(),
        }
    }
}
