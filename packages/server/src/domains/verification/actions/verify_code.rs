//! Verify code action

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::common::{require_phone, ProjectId, VerifyError, VerifyResult};
use crate::domains::verification::machines::{check_code, CodeCheck};
use crate::domains::verification::models::VerificationCode;
use crate::kernel::ServerDeps;

/// How many times a verify re-reads after losing a conditional update.
const MAX_CAS_ROUNDS: usize = 3;

/// Check a submitted code against the latest unused record for the phone.
pub async fn verify_code(
    project_id: ProjectId,
    raw_phone: &str,
    submitted_code: &str,
    deps: &ServerDeps,
) -> VerifyResult<VerificationCode> {
    verify_code_at(project_id, raw_phone, submitted_code, Utc::now(), deps).await
}

/// Same as [`verify_code`] with an explicit clock.
///
/// Both writes are conditional on the attempt count that was read, so two
/// concurrent verifies can never both consume one code or push `attempts`
/// past the limit. A lost race re-reads and decides again.
pub async fn verify_code_at(
    project_id: ProjectId,
    raw_phone: &str,
    submitted_code: &str,
    now: DateTime<Utc>,
    deps: &ServerDeps,
) -> VerifyResult<VerificationCode> {
    let submitted_code = submitted_code.trim();
    if raw_phone.trim().is_empty() || submitted_code.is_empty() {
        return Err(VerifyError::validation("phone and code required"));
    }
    let phone = require_phone(raw_phone)?;
    let digest = deps.code_hasher.digest(submitted_code);
    let max_attempts = deps.policy.max_attempts;

    for round in 1..=MAX_CAS_ROUNDS {
        let record = VerificationCode::find_latest_unused(project_id, &phone, &deps.db_pool)
            .await?
            .ok_or(VerifyError::CodeNotFound)?;

        match check_code(&record, &digest, now, max_attempts) {
            CodeCheck::Expired => return Err(VerifyError::CodeExpired),
            CodeCheck::Exhausted => return Err(VerifyError::RateLimited),
            CodeCheck::Mismatch => {
                let updated = VerificationCode::record_failed_attempt(
                    record.id,
                    record.attempts,
                    max_attempts,
                    &deps.db_pool,
                )
                .await?;
                if let Some(updated) = updated {
                    debug!(code_id = %updated.id, attempts = updated.attempts, "Wrong code submitted");
                    return Err(VerifyError::InvalidCode);
                }
            }
            CodeCheck::Match => {
                let used = VerificationCode::mark_used(
                    record.id,
                    record.attempts,
                    max_attempts,
                    now,
                    &deps.db_pool,
                )
                .await?;
                if let Some(used) = used {
                    info!(project_id = %project_id, code_id = %used.id, "Code verified");
                    return Ok(used);
                }
            }
        }

        debug!(code_id = %record.id, round, "Verification record changed concurrently, re-reading");
    }

    warn!(project_id = %project_id, "Gave up verifying after repeated concurrent updates");
    Err(VerifyError::Conflict)
}
