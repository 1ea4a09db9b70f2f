// [apps/api-server/src/handlers/folders.rs]
use axum::extract::{Extension, Path, State};
use axum::Json;
use meridian_domain_models::{Folder, ProjectRole};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::rbac::require_capability;
use crate::state::AppState;

pub async fn list_folders(State(state): State<AppState>, Extension(caller): Extension<AuthUser>, Path(pid): Path<String>) -> Result<Json<Vec<Folder>>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "view folders").await?;
    Ok(Json(state.folders.list(&pid).await?))
}

#[derive(Deserialize)]
pub struct CreateFolderRequest {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

pub async fn create_folder(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(pid): Path<String>,
    Json(body): Json<CreateFolderRequest>,
) -> Result<Json<Folder>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_edit_documents, "create folders").await?;
    let folder = state.folders.create(&pid, &body.name, body.parent_id.as_deref()).await?;
    Ok(Json(folder))
}

#[derive(Deserialize)]
pub struct RenameFolderRequest {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

pub async fn rename_folder(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((pid, fid)): Path<(String, String)>,
    Json(body): Json<RenameFolderRequest>,
) -> Result<(), ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_edit_documents, "rename folders").await?;
    state.folders.rename(&pid, &fid, &body.name, body.parent_id.as_deref()).await?;
    Ok(())
}

pub async fn delete_folder(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((pid, fid)): Path<(String, String)>,
) -> Result<(), ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_edit_documents, "delete folders").await?;
    state.folders.delete(&pid, &fid).await?;
    Ok(())
}
