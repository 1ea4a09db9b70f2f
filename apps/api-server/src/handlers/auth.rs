// [apps/api-server/src/handlers/auth.rs]
//! Login and password management. Token issuance itself is the one piece
//! of "auth" this crate owns end to end — see `crate::auth`.

use axum::extract::{Extension, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, verify_password, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub is_admin: bool,
}

pub async fn login(State(state): State<AppState>, Json(body): Json<LoginRequest>) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .users
        .get(&body.username)
        .await?
        .ok_or(ApiError::Unauthenticated)?;

    if !verify_password(&body.password, &user.password_hash) {
        return Err(ApiError::Unauthenticated);
    }

    let token = state.sessions.issue(&user.username);
    Ok(Json(LoginResponse {
        token,
        username: user.username,
        is_admin: user.is_admin,
    }))
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<(), ApiError> {
    let user = state
        .users
        .get(&caller.username)
        .await?
        .ok_or(ApiError::Unauthenticated)?;

    if !verify_password(&body.current_password, &user.password_hash) {
        return Err(ApiError::Validation("current password is incorrect".to_string()));
    }

    if body.new_password.len() < 8 {
        return Err(ApiError::Validation("new password must be at least 8 characters".to_string()));
    }

    let new_hash = hash_password(&body.new_password)?;
    state.users.update_password(&caller.username, &new_hash).await?;
    state.sessions.revoke_all_for(&caller.username);
    Ok(())
}
