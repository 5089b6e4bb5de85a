// Key-based authentication for the project and admin routes
//
// - x-project-key: resolves the calling project (must be active)
// - x-admin-key:   shared secret from ADMIN_API_KEY; routes answer 503 when unset
use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::common::{constant_time_eq, VerifyError};
use crate::domains::projects::actions::authenticate_project;
use crate::domains::projects::models::Project;
use crate::server::app::AxumAppState;

pub const PROJECT_KEY_HEADER: &str = "x-project-key";
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// The project a request was authenticated as (inserted by
/// [`require_project_key`]).
#[derive(Clone, Debug)]
pub struct AuthedProject(pub Project);

fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers().get(name).and_then(|v| v.to_str().ok())
}

pub async fn require_project_key(
    Extension(state): Extension<AxumAppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let api_key = header(&request, PROJECT_KEY_HEADER);
    match authenticate_project(api_key, &state.deps.db_pool).await {
        Ok(project) => {
            request.extensions_mut().insert(AuthedProject(project));
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

pub async fn require_admin_key(
    Extension(state): Extension<AxumAppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.admin_api_key.as_deref() else {
        return VerifyError::AdminDisabled.into_response();
    };

    match header(&request, ADMIN_KEY_HEADER) {
        Some(given) if constant_time_eq(given, expected) => next.run(request).await,
        _ => VerifyError::InvalidAdminKey.into_response(),
    }
}
