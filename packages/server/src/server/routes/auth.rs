//! OTP endpoints (`x-project-key`)

use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};

use crate::common::{VerifyError, VerifyResult};
use crate::domains::verification::actions::{is_linked, issue_code, verify_code};
use crate::server::app::AxumAppState;
use crate::server::middleware::AuthedProject;
use crate::server::routes::input::ScalarInput;

#[derive(Debug, Default, Deserialize)]
pub struct PhoneRequest {
    #[serde(default)]
    pub phone: Option<ScalarInput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub phone: Option<ScalarInput>,
    #[serde(default)]
    pub code: Option<ScalarInput>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub check: bool,
}

fn text_or_empty(field: &Option<ScalarInput>) -> String {
    field.as_ref().map(ScalarInput::to_text).unwrap_or_default()
}

fn required_phone(request: &PhoneRequest) -> VerifyResult<String> {
    Some(text_or_empty(&request.phone))
        .filter(|phone| !phone.trim().is_empty())
        .ok_or_else(|| VerifyError::validation("phone required"))
}

/// `POST /auth/request` - send a fresh code to the linked chat
pub async fn request_code_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(AuthedProject(project)): Extension<AuthedProject>,
    body: Option<Json<PhoneRequest>>,
) -> VerifyResult<Json<StatusResponse>> {
    let Json(request) = body.unwrap_or_default();
    issue_code(project.id, &required_phone(&request)?, &state.deps).await?;
    Ok(Json(StatusResponse { status: "sent" }))
}

/// `POST /auth/check` - whether the phone is linked under the project
pub async fn check_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(AuthedProject(project)): Extension<AuthedProject>,
    body: Option<Json<PhoneRequest>>,
) -> VerifyResult<Json<CheckResponse>> {
    let Json(request) = body.unwrap_or_default();
    let check = is_linked(project.id, &required_phone(&request)?, &state.deps).await?;
    Ok(Json(CheckResponse { check }))
}

/// `POST /auth/verify`
pub async fn verify_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(AuthedProject(project)): Extension<AuthedProject>,
    body: Option<Json<VerifyRequest>>,
) -> VerifyResult<Json<StatusResponse>> {
    let Json(request) = body.unwrap_or_default();
    verify_code(
        project.id,
        &text_or_empty(&request.phone),
        &text_or_empty(&request.code),
        &state.deps,
    )
    .await?;
    Ok(Json(StatusResponse { status: "verified" }))
}
