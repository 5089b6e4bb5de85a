//! Create project action

use sqlx::PgPool;
use tracing::info;

use crate::common::{VerifyError, VerifyResult};
use crate::domains::projects::keys::{generate_api_key, generate_invite_code};
use crate::domains::projects::models::Project;

/// Create an active project with freshly generated API key and invite code.
///
/// Used by `POST /projects`; the chat confirm path creates projects inside its
/// own transaction through [`Project::create`].
pub async fn create_project(name: &str, pool: &PgPool) -> VerifyResult<Project> {
    let name = name.trim();
    if name.is_empty() {
        return Err(VerifyError::validation("name required"));
    }

    let project = Project::create(name, &generate_api_key(), &generate_invite_code(), pool).await?;
    info!(project_id = %project.id, name = %project.name, "Project created");
    Ok(project)
}

/// Resolve the project behind an `x-project-key` header value.
pub async fn authenticate_project(api_key: Option<&str>, pool: &PgPool) -> VerifyResult<Project> {
    let api_key = api_key
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or(VerifyError::MissingProjectKey)?;

    Project::find_active_by_api_key(api_key, pool)
        .await?
        .ok_or(VerifyError::InvalidProjectKey)
}
