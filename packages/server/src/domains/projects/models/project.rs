use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgExecutor, PgPool};

use crate::common::ProjectId;

/// Project - a tenant that verifies its users through the bot
///
/// `api_key` authenticates server-to-server calls; `invite_code` is public
/// and travels inside `/start` deep links. Both are unique and never change.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub api_key: String,
    pub invite_code: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Project {
    /// Insert a new active project. Takes any executor so the admin confirm
    /// path can run it inside its transaction.
    pub async fn create<'e>(
        name: &str,
        api_key: &str,
        invite_code: &str,
        executor: impl PgExecutor<'e>,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO projects (id, name, api_key, invite_code, is_active)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING *
            "#,
        )
        .bind(ProjectId::new())
        .bind(name)
        .bind(api_key)
        .bind(invite_code)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: ProjectId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find an active project by its API key
    pub async fn find_active_by_api_key(api_key: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM projects WHERE api_key = $1 AND is_active")
            .bind(api_key)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find an active project by its deep-link invite code
    pub async fn find_active_by_invite_code(code: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM projects WHERE invite_code = $1 AND is_active")
            .bind(code)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// All projects, newest first
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM projects ORDER BY created_at DESC, id DESC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Activate or deactivate a project. Keys and codes are left untouched.
    pub async fn set_active(id: ProjectId, is_active: bool, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("UPDATE projects SET is_active = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(is_active)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }
}
