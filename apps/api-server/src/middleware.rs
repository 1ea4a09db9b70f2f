// [apps/api-server/src/middleware.rs]
//! Bearer-token authentication guard. Every route except `/healthz` and
//! `/login` sits behind this; it resolves the token against the shared
//! `SessionRegistry` and injects `AuthUser` into the request extensions
//! for handlers to pull out with `Extension<AuthUser>`.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn auth_guard(State(state): State<AppState>, mut req: Request, next: Next) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthenticated)?;

    let username = state.sessions.username_for(token).ok_or(ApiError::Unauthenticated)?;

    req.extensions_mut().insert(AuthUser { username });
    Ok(next.run(req).await)
}
