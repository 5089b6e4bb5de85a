use axum::{extract::Extension, Json};
use serde::Deserialize;

use crate::common::{VerifyError, VerifyResult};
use crate::domains::verification::actions::notify;
use crate::server::app::AxumAppState;
use crate::server::routes::auth::StatusResponse;
use crate::server::routes::input::ScalarInput;

#[derive(Debug, Default, Deserialize)]
pub struct NotifyRequest {
    #[serde(default)]
    pub user_id: Option<ScalarInput>,
    #[serde(default)]
    pub code: Option<ScalarInput>,
}

/// `POST /notify` - deliver a caller-chosen code to a chat id
pub async fn notify_handler(
    Extension(state): Extension<AxumAppState>,
    body: Option<Json<NotifyRequest>>,
) -> VerifyResult<Json<StatusResponse>> {
    let Json(request) = body.unwrap_or_default();
    let chat_id = request
        .user_id
        .as_ref()
        .and_then(ScalarInput::to_chat_id)
        .ok_or_else(|| VerifyError::validation("user_id and code required"))?;

    let code = request
        .code
        .as_ref()
        .map(ScalarInput::to_text)
        .unwrap_or_default();
    notify(chat_id, &code, &state.deps).await?;
    Ok(Json(StatusResponse { status: "sent" }))
}
