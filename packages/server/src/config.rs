use anyhow::{Context, Result};
use chrono::Duration;
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bot_token: String,
    pub port: u16,
    pub code_ttl_seconds: i64,
    pub max_attempts: i32,
    pub start_session_ttl_seconds: i64,
    pub admin_action_ttl_seconds: i64,
    /// Shared secret for `/projects`; admin routes answer 503 without it.
    pub admin_api_key: Option<String>,
    /// Telegram user id allowed to drive the admin conversation.
    pub admin_telegram_id: Option<i64>,
    pub code_hash_pepper: Option<String>,
    pub bot_polling_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            database_url: non_empty("DATABASE_URL").context("DATABASE_URL must be set")?,
            bot_token: non_empty("BOT_TOKEN").context("BOT_TOKEN must be set")?,
            port: parse_or(&lookup, "PORT", 3000)?,
            code_ttl_seconds: positive(parse_or(&lookup, "CODE_TTL_SECONDS", 300)?, "CODE_TTL_SECONDS")?,
            max_attempts: positive(parse_or(&lookup, "MAX_ATTEMPTS", 5)?, "MAX_ATTEMPTS")?,
            start_session_ttl_seconds: positive(
                parse_or(&lookup, "START_SESSION_TTL_SECONDS", 600)?,
                "START_SESSION_TTL_SECONDS",
            )?,
            admin_action_ttl_seconds: positive(
                parse_or(&lookup, "ADMIN_ACTION_TTL_SECONDS", 300)?,
                "ADMIN_ACTION_TTL_SECONDS",
            )?,
            admin_api_key: non_empty("ADMIN_API_KEY"),
            // 0 is the conventional "unset" value
            admin_telegram_id: match parse_or::<i64>(&lookup, "ADMIN_TELEGRAM_ID", 0)? {
                0 => None,
                id => Some(id),
            },
            code_hash_pepper: non_empty("CODE_HASH_PEPPER"),
            bot_polling_enabled: parse_or(&lookup, "BOT_POLLING_ENABLED", true)?,
        })
    }

    pub fn policy(&self) -> VerificationPolicy {
        VerificationPolicy {
            code_ttl: Duration::seconds(self.code_ttl_seconds),
            max_attempts: self.max_attempts,
            start_session_ttl: Duration::seconds(self.start_session_ttl_seconds),
            admin_action_ttl: Duration::seconds(self.admin_action_ttl_seconds),
        }
    }
}

/// Lifetimes and limits applied by the verification state machines.
#[derive(Debug, Clone, Copy)]
pub struct VerificationPolicy {
    pub code_ttl: Duration,
    pub max_attempts: i32,
    pub start_session_ttl: Duration,
    pub admin_action_ttl: Duration,
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self {
            code_ttl: Duration::seconds(300),
            max_attempts: 5,
            start_session_ttl: Duration::seconds(600),
            admin_action_ttl: Duration::seconds(300),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid value, got {:?}", key, raw)),
        _ => Ok(default),
    }
}

fn positive<T: PartialOrd + Default>(value: T, key: &str) -> Result<T> {
    if value <= T::default() {
        anyhow::bail!("{} must be positive", key);
    }
    Ok(value)
}
