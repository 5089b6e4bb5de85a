//! Admin project registry endpoints (`x-admin-key`)

use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};

use crate::common::{ProjectId, VerifyResult};
use crate::domains::projects::actions::create_project;
use crate::domains::projects::models::Project;
use crate::server::app::AxumAppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedProject {
    pub id: ProjectId,
    pub name: String,
    pub key: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: String,
    pub code: String,
    pub key: String,
    pub is_active: bool,
}

impl From<Project> for ProjectSummary {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            code: project.invite_code,
            key: project.api_key,
            is_active: project.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectList {
    pub projects: Vec<ProjectSummary>,
}

/// `POST /projects`
pub async fn create_project_handler(
    Extension(state): Extension<AxumAppState>,
    body: Option<Json<CreateProjectRequest>>,
) -> VerifyResult<Json<CreatedProject>> {
    let Json(request) = body.unwrap_or_default();
    let project = create_project(request.name.as_deref().unwrap_or(""), &state.deps.db_pool).await?;

    Ok(Json(CreatedProject {
        id: project.id,
        name: project.name,
        key: project.api_key,
        code: project.invite_code,
    }))
}

/// `GET /projects`, newest first
pub async fn list_projects_handler(
    Extension(state): Extension<AxumAppState>,
) -> VerifyResult<Json<ProjectList>> {
    let projects = Project::find_all(&state.deps.db_pool).await?;
    Ok(Json(ProjectList {
        projects: projects.into_iter().map(ProjectSummary::from).collect(),
    }))
}
