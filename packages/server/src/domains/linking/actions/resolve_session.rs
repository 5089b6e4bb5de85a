//! Resolve session action

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::common::{require_phone, VerifyError, VerifyResult};
use crate::domains::linking::models::{LinkedIdentity, StartSession};
use crate::domains::projects::models::Project;
use crate::kernel::ServerDeps;

/// Bind the phone a chat just shared to the project of its latest start
/// session.
pub async fn resolve_session(
    chat_id: i64,
    raw_phone: &str,
    username: &str,
    deps: &ServerDeps,
) -> VerifyResult<LinkedIdentity> {
    resolve_session_at(chat_id, raw_phone, username, Utc::now(), deps).await
}

/// Same as [`resolve_session`] with an explicit clock.
pub async fn resolve_session_at(
    chat_id: i64,
    raw_phone: &str,
    username: &str,
    now: DateTime<Utc>,
    deps: &ServerDeps,
) -> VerifyResult<LinkedIdentity> {
    let phone = require_phone(raw_phone)?;

    let session = StartSession::find_latest_for_chat(chat_id, &deps.db_pool)
        .await?
        .ok_or(VerifyError::SessionNotFound)?;
    if session.is_expired(now) {
        debug!(chat_id, session_id = %session.id, "Latest start session expired");
        return Err(VerifyError::SessionNotFound);
    }

    let project = Project::find_by_id(session.project_id, &deps.db_pool)
        .await?
        .filter(|project| project.is_active)
        .ok_or(VerifyError::ProjectInactive)?;

    let identity =
        LinkedIdentity::upsert(project.id, &phone, chat_id, username, &deps.db_pool).await?;

    info!(
        chat_id,
        project_id = %project.id,
        identity_id = %identity.id,
        "Phone linked to chat"
    );
    Ok(identity)
}
