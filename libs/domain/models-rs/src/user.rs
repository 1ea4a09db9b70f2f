// [libs/domain/models-rs/src/user.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A platform-wide login identity, distinct from a project [`crate::Member`]
/// row. `is_admin` gates the `/users` management routes; project-level
/// authorization is entirely driven by `Member::role`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}
