// [apps/api-server/src/handlers/options.rs]
use axum::extract::{Extension, Path, State};
use axum::Json;
use meridian_domain_models::{OptionCategory, ProjectOption, ProjectRole};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::rbac::require_capability;
use crate::state::AppState;

pub async fn list_options(State(state): State<AppState>, Extension(caller): Extension<AuthUser>, Path(pid): Path<String>) -> Result<Json<Vec<ProjectOption>>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "view upload form options").await?;
    Ok(Json(state.options.list(&pid).await?))
}

#[derive(Deserialize)]
pub struct AddOptionRequest {
    pub category: OptionCategory,
    pub value: String,
}

pub async fn add_option(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(pid): Path<String>,
    Json(body): Json<AddOptionRequest>,
) -> Result<(), ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_edit_documents, "add upload form options").await?;
    state.options.add(&pid, body.category, &body.value).await?;
    Ok(())
}
