//! Notify action - deliver a caller-chosen code to a raw chat id

use tracing::{info, warn};

use crate::common::{VerifyError, VerifyResult};
use crate::kernel::ServerDeps;

pub fn notify_message(code: &str) -> String {
    format!("Verification code: {}", code)
}

/// Send `code` to `chat_id` without storing anything.
pub async fn notify(chat_id: i64, code: &str, deps: &ServerDeps) -> VerifyResult<()> {
    let code = code.trim();
    if chat_id == 0 || code.is_empty() {
        return Err(VerifyError::validation("user_id and code required"));
    }

    deps.messenger
        .send_text(chat_id, &notify_message(code))
        .await
        .map_err(|e| {
            warn!(chat_id, error = %e, "Notify delivery failed");
            VerifyError::Delivery("cannot send to user_id".to_string())
        })?;

    info!(chat_id, "Notify code delivered");
    Ok(())
}
