// [apps/api-server/src/rbac.rs]
//! Project-scoped authorization helpers. `User::is_admin` only gates the
//! `/users` surface; everything project-scoped is decided by the
//! caller's `Member::role`, per `meridian_domain_models::user`.

use meridian_domain_models::{Member, ProjectRole};

use crate::error::ApiError;
use crate::state::AppState;

/// Loads the caller's membership row, 403ing if they aren't on the project.
pub async fn require_member(state: &AppState, project_id: &str, username: &str) -> Result<Member, ApiError> {
    state
        .members
        .get(project_id, username)
        .await?
        .ok_or_else(|| ApiError::Forbidden(format!("`{username}` is not a member of this project")))
}

/// Loads the caller's membership and checks it against a capability
/// predicate drawn from `ProjectRole`'s `can_*` methods.
pub async fn require_capability(
    state: &AppState,
    project_id: &str,
    username: &str,
    capability: impl Fn(ProjectRole) -> bool,
    what: &str,
) -> Result<Member, ApiError> {
    let member = require_member(state, project_id, username).await?;
    if capability(member.role) {
        Ok(member)
    } else {
        Err(ApiError::Forbidden(format!("`{username}` does not have permission to {what}")))
    }
}

pub async fn require_admin(state: &AppState, username: &str) -> Result<(), ApiError> {
    let user = state
        .users
        .get(username)
        .await?
        .ok_or_else(|| ApiError::Forbidden("unknown user".to_string()))?;
    if user.is_admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden("administrator privileges required".to_string()))
    }
}
