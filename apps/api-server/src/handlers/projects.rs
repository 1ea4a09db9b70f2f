// [apps/api-server/src/handlers/projects.rs]
use axum::extract::{Extension, Path, State};
use axum::Json;
use chrono::Utc;
use meridian_domain_models::{Member, Project, ProjectRole, ProjectVisibility};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::rbac::require_capability;
use crate::state::AppState;

pub async fn list_projects(State(state): State<AppState>, Extension(caller): Extension<AuthUser>) -> Result<Json<Vec<Project>>, ApiError> {
    let all = state.projects.list().await?;
    let mut visible = Vec::new();
    for project in all {
        if state.members.get(&project.id, &caller.username).await?.is_some() {
            visible.push(project);
        }
    }
    Ok(Json(visible))
}

#[derive(Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub visibility: Option<ProjectVisibility>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub backup_interval_hours: Option<u32>,
}

pub async fn create_project(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Json(body): Json<CreateProjectRequest>,
) -> Result<Json<Project>, ApiError> {
    let user = state
        .users
        .get(&caller.username)
        .await?
        .ok_or(ApiError::Unauthenticated)?;
    if !user.is_admin {
        return Err(ApiError::Forbidden("only administrators may create projects".to_string()));
    }
    if body.name.trim().is_empty() {
        return Err(ApiError::Validation("project name must be non-empty".to_string()));
    }

    let project = Project {
        id: Uuid::new_v4().to_string(),
        name: body.name,
        visibility: body.visibility.unwrap_or(ProjectVisibility::Private),
        description: body.description,
        topo_url: None,
        backup_interval_hours: body.backup_interval_hours,
        created_by: caller.username.clone(),
        created_at: Utc::now(),
    };
    state.projects.create(&project).await?;
    state
        .members
        .add(&Member {
            project_id: project.id.clone(),
            username: caller.username,
            role: ProjectRole::Admin,
        })
        .await?;
    Ok(Json(project))
}

pub async fn get_project(State(state): State<AppState>, Extension(caller): Extension<AuthUser>, Path(pid): Path<String>) -> Result<Json<Project>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "view this project").await?;
    let project = state.projects.get(&pid).await?.ok_or_else(|| ApiError::NotFound(format!("project `{pid}` not found")))?;
    Ok(Json(project))
}

#[derive(Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub visibility: Option<ProjectVisibility>,
    pub description: Option<String>,
    pub backup_interval_hours: Option<u32>,
}

pub async fn update_project(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(pid): Path<String>,
    Json(body): Json<UpdateProjectRequest>,
) -> Result<Json<Project>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_manage_project_settings, "edit this project's settings").await?;

    let mut project = state.projects.get(&pid).await?.ok_or_else(|| ApiError::NotFound(format!("project `{pid}` not found")))?;
    if let Some(name) = body.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("project name must be non-empty".to_string()));
        }
        project.name = name;
    }
    if let Some(visibility) = body.visibility {
        project.visibility = visibility;
    }
    if let Some(description) = body.description {
        project.description = description;
    }
    if body.backup_interval_hours.is_some() {
        project.backup_interval_hours = body.backup_interval_hours;
    }

    state.projects.update(&project).await?;
    Ok(Json(project))
}

pub async fn delete_project(State(state): State<AppState>, Extension(caller): Extension<AuthUser>, Path(pid): Path<String>) -> Result<(), ApiError> {
    require_capability(&state, &pid, &caller.username, |r| r == ProjectRole::Admin, "delete this project").await?;
    state.projects.delete(&pid).await?;
    Ok(())
}
