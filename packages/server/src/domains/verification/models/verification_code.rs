use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{ProjectId, VerificationCodeId};

/// VerificationCode - one issued OTP for a (project, phone)
///
/// Only the digest of the code is stored. A record is terminal once
/// `used_at` is set; the attempt counter only ever grows.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VerificationCode {
    pub id: VerificationCodeId,
    pub project_id: ProjectId,
    pub phone: String,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    pub attempts: i32,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl VerificationCode {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl VerificationCode {
    pub async fn create(
        project_id: ProjectId,
        phone: &str,
        code_hash: &str,
        expires_at: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO verification_codes (id, project_id, phone, code_hash, expires_at, attempts)
            VALUES ($1, $2, $3, $4, $5, 0)
            RETURNING *
            "#,
        )
        .bind(VerificationCodeId::new())
        .bind(project_id)
        .bind(phone)
        .bind(code_hash)
        .bind(expires_at)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// The authoritative record: most recent one not yet used
    pub async fn find_latest_unused(
        project_id: ProjectId,
        phone: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM verification_codes
            WHERE project_id = $1 AND phone = $2 AND used_at IS NULL
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(project_id)
        .bind(phone)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Count one failed attempt, but only if the record still looks exactly
    /// like it did when it was read. `None` means another request got there
    /// first.
    pub async fn record_failed_attempt(
        id: VerificationCodeId,
        seen_attempts: i32,
        max_attempts: i32,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE verification_codes
            SET attempts = attempts + 1
            WHERE id = $1
              AND used_at IS NULL
              AND attempts = $2
              AND attempts < $3
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(seen_attempts)
        .bind(max_attempts)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Consume the code. Same guard as [`Self::record_failed_attempt`], and
    /// the code must still be live at `now`.
    pub async fn mark_used(
        id: VerificationCodeId,
        seen_attempts: i32,
        max_attempts: i32,
        now: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE verification_codes
            SET used_at = $4
            WHERE id = $1
              AND used_at IS NULL
              AND attempts = $2
              AND attempts < $3
              AND expires_at >= $4
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(seen_attempts)
        .bind(max_attempts)
        .bind(now)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: VerificationCodeId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM verification_codes WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Passive expiry (called by the sweeper)
    pub async fn delete_expired(now: DateTime<Utc>, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM verification_codes WHERE expires_at < $1")
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
