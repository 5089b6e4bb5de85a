//! HTTP mapping for domain errors: `{"error": "<message>"}` with a status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::common::VerifyError;

impl VerifyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::MissingProjectKey
            | Self::SessionNotFound
            | Self::ProjectInactive
            | Self::CodeNotFound
            | Self::CodeExpired
            | Self::InvalidCode
            | Self::Delivery(_) => StatusCode::BAD_REQUEST,
            Self::InvalidProjectKey | Self::InvalidAdminKey => StatusCode::UNAUTHORIZED,
            Self::NotLinked | Self::ProjectNotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::AdminDisabled => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the caller
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            "internal error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for VerifyError {
    fn into_response(self) -> Response {
        if self.is_internal() {
            tracing::error!(error = %self, "Request failed");
        }
        let body = Json(json!({ "error": self.public_message() }));
        (self.status_code(), body).into_response()
    }
}
