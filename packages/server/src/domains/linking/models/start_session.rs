use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{ProjectId, StartSessionId};

/// StartSession - a chat opened a project's deep link and has not yet shared
/// its phone number.
///
/// Several sessions may exist for one chat; only the most recent one is ever
/// resolved. Expired rows are removed by the sweeper, but a row is only
/// trusted after [`StartSession::is_expired`] says so.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StartSession {
    pub id: StartSessionId,
    pub chat_id: i64,
    pub project_id: ProjectId,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl StartSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl StartSession {
    pub async fn create(
        chat_id: i64,
        project_id: ProjectId,
        expires_at: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO start_sessions (id, chat_id, project_id, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(StartSessionId::new())
        .bind(chat_id)
        .bind(project_id)
        .bind(expires_at)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Most recently created session for a chat, expired or not
    pub async fn find_latest_for_chat(chat_id: i64, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM start_sessions
            WHERE chat_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(chat_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Passive expiry (called by the sweeper)
    pub async fn delete_expired(now: DateTime<Utc>, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM start_sessions WHERE expires_at < $1")
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
