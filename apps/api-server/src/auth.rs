// [apps/api-server/src/auth.rs]
//! Password hashing and bearer-token session tracking. Token issuance is
//! explicitly out of scope for the core (`spec.md` §1), so sessions are
//! a plain in-memory token → username map rather than a signed/stateless
//! scheme — it survives exactly as long as the process, which is enough
//! for `/login` to hand back something `auth_guard` can check.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::ApiError;

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
}

/// In-memory bearer token registry. Cloned cheaply via the shared lock;
/// every clone sees the same table.
#[derive(Default)]
pub struct SessionRegistry {
    tokens: RwLock<HashMap<String, String>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, username: &str) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens.write().unwrap().insert(token.clone(), username.to_string());
        token
    }

    pub fn username_for(&self, token: &str) -> Option<String> {
        self.tokens.read().unwrap().get(token).cloned()
    }

    pub fn revoke_all_for(&self, username: &str) {
        self.tokens.write().unwrap().retain(|_, u| u != username);
    }
}

/// The caller's identity, injected into request extensions by `auth_guard`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}
