use crate::common::{require_phone, ProjectId, VerifyResult};
use crate::domains::linking::models::LinkedIdentity;
use crate::kernel::ServerDeps;

/// Whether the phone has been linked to a chat under this project.
pub async fn is_linked(project_id: ProjectId, raw_phone: &str, deps: &ServerDeps) -> VerifyResult<bool> {
    let phone = require_phone(raw_phone)?;
    Ok(LinkedIdentity::exists(project_id, &phone, &deps.db_pool).await?)
}
