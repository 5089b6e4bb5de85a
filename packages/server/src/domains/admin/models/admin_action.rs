use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::{PgExecutor, PgPool};

use crate::common::AdminActionId;

/// Where an admin conversation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "admin_action_step", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdminStep {
    AwaitingName,
    AwaitingConfirmation,
    Completed,
    Cancelled,
}

impl AdminStep {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// AdminAction - a persisted multi-step chat conversation with the admin
///
/// Only the latest action per (chat, action type) is authoritative, and only
/// while `expires_at` has not passed.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminAction {
    pub id: AdminActionId,
    pub chat_id: i64,
    pub action_type: String,
    pub step: AdminStep,
    pub payload: JsonValue,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl AdminAction {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Expecting further input at `now`
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        !self.step.is_terminal() && !self.is_expired(now)
    }

    /// Candidate project name collected in the name step
    pub fn project_name(&self) -> Option<&str> {
        self.payload.get("name").and_then(JsonValue::as_str)
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl AdminAction {
    pub async fn create(
        chat_id: i64,
        action_type: &str,
        step: AdminStep,
        payload: JsonValue,
        expires_at: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO admin_actions (id, chat_id, action_type, step, payload, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(AdminActionId::new())
        .bind(chat_id)
        .bind(action_type)
        .bind(step)
        .bind(payload)
        .bind(expires_at)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: AdminActionId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM admin_actions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Most recent action of a type for a chat, whatever its state
    pub async fn find_latest(
        chat_id: i64,
        action_type: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM admin_actions
            WHERE chat_id = $1 AND action_type = $2
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(chat_id)
        .bind(action_type)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Move a live action from `from` to `to`, replacing payload and expiry.
    ///
    /// Matches only while the action is still the latest for its chat and
    /// type, sits in `from`, and has not expired at `now`.
    pub async fn advance(
        id: AdminActionId,
        from: AdminStep,
        to: AdminStep,
        payload: JsonValue,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE admin_actions a
            SET step = $3, payload = $4, expires_at = $5
            WHERE a.id = $1
              AND a.step = $2
              AND a.expires_at >= $6
              AND a.id = (
                  SELECT l.id FROM admin_actions l
                  WHERE l.chat_id = a.chat_id AND l.action_type = a.action_type
                  ORDER BY l.created_at DESC, l.id DESC
                  LIMIT 1
              )
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(payload)
        .bind(expires_at)
        .bind(now)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Close an action awaiting confirmation with a terminal step and expire
    /// it immediately.
    ///
    /// The action must belong to `chat_id`, be the latest of its type and be
    /// unexpired at `now`. Takes any executor so confirmation can share a
    /// transaction with the write it authorizes.
    pub async fn finish<'e>(
        id: AdminActionId,
        chat_id: i64,
        action_type: &str,
        to: AdminStep,
        now: DateTime<Utc>,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE admin_actions a
            SET step = $4, expires_at = $6
            WHERE a.id = $1
              AND a.chat_id = $2
              AND a.action_type = $3
              AND a.step = $7
              AND a.expires_at >= $5
              AND a.id = (
                  SELECT l.id FROM admin_actions l
                  WHERE l.chat_id = $2 AND l.action_type = $3
                  ORDER BY l.created_at DESC, l.id DESC
                  LIMIT 1
              )
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(chat_id)
        .bind(action_type)
        .bind(to)
        .bind(now)
        .bind(now - Duration::seconds(1))
        .bind(AdminStep::AwaitingConfirmation)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Passive expiry (called by the sweeper)
    pub async fn delete_expired(now: DateTime<Utc>, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM admin_actions WHERE expires_at < $1")
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
