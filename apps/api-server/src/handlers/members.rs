// [apps/api-server/src/handlers/members.rs]
use axum::extract::{Extension, Path, State};
use axum::Json;
use meridian_domain_models::{Member, ProjectRole};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::rbac::{require_capability, require_member};
use crate::state::AppState;

pub async fn list_members(State(state): State<AppState>, Extension(caller): Extension<AuthUser>, Path(pid): Path<String>) -> Result<Json<Vec<Member>>, ApiError> {
    require_member(&state, &pid, &caller.username).await?;
    Ok(Json(state.members.list(&pid).await?))
}

#[derive(Deserialize)]
pub struct AddMemberRequest {
    pub username: String,
    pub role: ProjectRole,
}

pub async fn add_member(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(pid): Path<String>,
    Json(body): Json<AddMemberRequest>,
) -> Result<Json<Member>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_manage_users, "manage project membership").await?;

    if state.users.get(&body.username).await?.is_none() {
        return Err(ApiError::Validation(format!("no such user `{}`", body.username)));
    }

    let member = Member {
        project_id: pid,
        username: body.username,
        role: body.role,
    };
    state.members.add(&member).await?;
    Ok(Json(member))
}

#[derive(Deserialize)]
pub struct UpdateMemberRoleRequest {
    pub role: ProjectRole,
}

pub async fn update_member_role(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((pid, username)): Path<(String, String)>,
    Json(body): Json<UpdateMemberRoleRequest>,
) -> Result<(), ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_manage_users, "manage project membership").await?;
    state.members.update_role(&pid, &username, body.role).await?;
    Ok(())
}

pub async fn remove_member(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((pid, username)): Path<(String, String)>,
) -> Result<(), ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_manage_users, "manage project membership").await?;
    state.members.remove(&pid, &username).await?;
    Ok(())
}
