use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{LinkedIdentityId, ProjectId};

/// LinkedIdentity - the chat that receives codes for a (project, phone)
///
/// Unique per (project, phone) and per (project, chat).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LinkedIdentity {
    pub id: LinkedIdentityId,
    pub project_id: ProjectId,
    pub phone: String,
    pub chat_id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl LinkedIdentity {
    /// Bind (project, phone) to a chat, replacing any previous binding.
    ///
    /// A chat holds at most one phone per project: if the chat was linked to
    /// a different phone, that row is removed in the same transaction so the
    /// newest submission wins without tripping the (project, chat) constraint.
    pub async fn upsert(
        project_id: ProjectId,
        phone: &str,
        chat_id: i64,
        username: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "DELETE FROM linked_identities WHERE project_id = $1 AND chat_id = $2 AND phone <> $3",
        )
        .bind(project_id)
        .bind(chat_id)
        .bind(phone)
        .execute(&mut *tx)
        .await?;

        let identity = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO linked_identities (id, project_id, phone, chat_id, username)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (project_id, phone) DO UPDATE
            SET chat_id = EXCLUDED.chat_id,
                username = EXCLUDED.username,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(LinkedIdentityId::new())
        .bind(project_id)
        .bind(phone)
        .bind(chat_id)
        .bind(username)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(identity)
    }

    pub async fn find_by_phone(
        project_id: ProjectId,
        phone: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM linked_identities WHERE project_id = $1 AND phone = $2",
        )
        .bind(project_id)
        .bind(phone)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_chat(
        project_id: ProjectId,
        chat_id: i64,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM linked_identities WHERE project_id = $1 AND chat_id = $2",
        )
        .bind(project_id)
        .bind(chat_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn exists(project_id: ProjectId, phone: &str, pool: &PgPool) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM linked_identities WHERE project_id = $1 AND phone = $2)",
        )
        .bind(project_id)
        .bind(phone)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }
}
