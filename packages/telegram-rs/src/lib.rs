//! Minimal Telegram Bot API client: send messages, answer button presses and
//! long-poll for updates.

pub mod models;

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::models::{ApiResponse, Message, ReplyMarkup, Update};

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("request to Telegram failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API error {code:?}: {description}")]
    Api {
        code: Option<i64>,
        description: String,
    },
}

#[derive(Debug, Clone)]
pub struct TelegramOptions {
    pub bot_token: String,
    pub api_base: String,
}

impl TelegramOptions {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelegramService {
    options: TelegramOptions,
    client: Client,
}

impl TelegramService {
    pub fn new(options: TelegramOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.options.api_base.trim_end_matches('/'),
            self.options.bot_token,
            method
        )
    }

    async fn call<P, R>(&self, method: &str, params: &P, timeout: Option<Duration>) -> Result<R, TelegramError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self.client.post(self.method_url(method)).json(params);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response: ApiResponse<R> = request.send().await?.json().await?;

        match (response.ok, response.result) {
            (true, Some(result)) => Ok(result),
            _ => {
                let description = response
                    .description
                    .unwrap_or_else(|| "empty response".to_string());
                tracing::warn!(method, error_code = ?response.error_code, %description, "Telegram call rejected");
                Err(TelegramError::Api {
                    code: response.error_code,
                    description,
                })
            }
        }
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<ReplyMarkup>,
    ) -> Result<Message, TelegramError> {
        let mut params = json!({ "chat_id": chat_id, "text": text });
        if let Some(markup) = reply_markup {
            params["reply_markup"] = serde_json::to_value(markup).unwrap_or_default();
        }
        self.call("sendMessage", &params, None).await
    }

    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: &str,
    ) -> Result<bool, TelegramError> {
        let params = json!({ "callback_query_id": callback_query_id, "text": text });
        self.call("answerCallbackQuery", &params, None).await
    }

    /// Long-poll for updates newer than `offset`.
    ///
    /// The HTTP timeout is padded past `timeout_secs` so the server closes the
    /// poll before the client gives up on it.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let params = json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message", "callback_query"],
        });
        self.call(
            "getUpdates",
            &params,
            Some(Duration::from_secs(timeout_secs + 10)),
        )
        .await
    }
}
