// [apps/api-server/src/handlers/users.rs]
//! Platform-wide user management, gated by `User::is_admin` rather than
//! any per-project role.

use axum::extract::{Extension, Path, State};
use axum::Json;
use chrono::Utc;
use meridian_domain_models::User;
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, AuthUser};
use crate::error::ApiError;
use crate::rbac::require_admin;
use crate::state::AppState;

#[derive(Serialize)]
pub struct UserView {
    pub username: String,
    pub is_admin: bool,
    pub created_at: chrono::DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        Self {
            username: u.username,
            is_admin: u.is_admin,
            created_at: u.created_at,
        }
    }
}

pub async fn list_users(State(state): State<AppState>, Extension(caller): Extension<AuthUser>) -> Result<Json<Vec<UserView>>, ApiError> {
    require_admin(&state, &caller.username).await?;
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

pub async fn create_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Json(body): Json<CreateUserRequest>,
) -> Result<Json<UserView>, ApiError> {
    require_admin(&state, &caller.username).await?;

    if body.username.trim().is_empty() {
        return Err(ApiError::Validation("username must be non-empty".to_string()));
    }
    if body.password.len() < 8 {
        return Err(ApiError::Validation("password must be at least 8 characters".to_string()));
    }

    let user = User {
        username: body.username,
        password_hash: hash_password(&body.password)?,
        is_admin: body.is_admin,
        created_at: Utc::now(),
    };
    state.users.create(&user).await?;
    Ok(Json(user.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(username): Path<String>,
) -> Result<(), ApiError> {
    require_admin(&state, &caller.username).await?;
    if username == caller.username {
        return Err(ApiError::Validation("cannot delete your own account".to_string()));
    }
    state.users.delete(&username).await?;
    state.sessions.revoke_all_for(&username);
    Ok(())
}
