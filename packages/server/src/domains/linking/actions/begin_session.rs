//! Begin session action

use chrono::Utc;
use tracing::info;

use crate::common::{VerifyError, VerifyResult};
use crate::domains::linking::models::StartSession;
use crate::domains::projects::models::Project;
use crate::kernel::ServerDeps;

/// Open a start session for a chat that followed a project's deep link.
///
/// Returns the session together with the project it is bound to so the
/// caller can name the project when asking for the phone number.
pub async fn begin_session(
    chat_id: i64,
    invite_code: &str,
    deps: &ServerDeps,
) -> VerifyResult<(StartSession, Project)> {
    let invite_code = invite_code.trim();
    if invite_code.is_empty() {
        return Err(VerifyError::ProjectNotFound);
    }

    let project = Project::find_active_by_invite_code(invite_code, &deps.db_pool)
        .await?
        .ok_or(VerifyError::ProjectNotFound)?;

    let expires_at = Utc::now() + deps.policy.start_session_ttl;
    let session = StartSession::create(chat_id, project.id, expires_at, &deps.db_pool).await?;

    info!(
        chat_id,
        project_id = %project.id,
        session_id = %session.id,
        "Start session opened"
    );
    Ok((session, project))
}
