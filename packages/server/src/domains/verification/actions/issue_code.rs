//! Issue code action

use chrono::Utc;
use tracing::{info, warn};

use crate::common::{require_phone, ProjectId, VerifyError, VerifyResult};
use crate::domains::linking::models::LinkedIdentity;
use crate::domains::verification::machines::generate_code;
use crate::domains::verification::models::VerificationCode;
use crate::kernel::ServerDeps;

/// Text delivered to the chat along with a fresh code.
pub fn code_message(code: &str, ttl_seconds: i64) -> String {
    format!("Verification code: {}\nValid for {} seconds.", code, ttl_seconds)
}

/// Generate, store and deliver a code for a linked phone.
///
/// The plaintext code only ever leaves through the messenger. If delivery
/// fails the stored record stays in place; the caller simply issues again.
pub async fn issue_code(
    project_id: ProjectId,
    raw_phone: &str,
    deps: &ServerDeps,
) -> VerifyResult<VerificationCode> {
    let phone = require_phone(raw_phone)?;

    let identity = LinkedIdentity::find_by_phone(project_id, &phone, &deps.db_pool)
        .await?
        .ok_or(VerifyError::NotLinked)?;

    let code = generate_code();
    let ttl = deps.policy.code_ttl;
    let record = VerificationCode::create(
        project_id,
        &phone,
        &deps.code_hasher.digest(&code),
        Utc::now() + ttl,
        &deps.db_pool,
    )
    .await?;

    if let Err(e) = deps
        .messenger
        .send_text(identity.chat_id, &code_message(&code, ttl.num_seconds()))
        .await
    {
        warn!(
            project_id = %project_id,
            code_id = %record.id,
            chat_id = identity.chat_id,
            error = %e,
            "Failed to deliver verification code"
        );
        return Err(VerifyError::Delivery("cannot send code to telegram".to_string()));
    }

    info!(project_id = %project_id, code_id = %record.id, "Verification code sent");
    Ok(record)
}
