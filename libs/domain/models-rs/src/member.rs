// [libs/domain/models-rs/src/member.rs]
use serde::{Deserialize, Serialize};

/// Per-project role. Exactly one per (project, username).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    Viewer,
    Engineer,
    Manager,
    Admin,
}

impl ProjectRole {
    pub fn can_read(self) -> bool {
        true
    }

    pub fn can_edit_documents(self) -> bool {
        matches!(self, Self::Engineer | Self::Manager | Self::Admin)
    }

    pub fn can_manage_project_settings(self) -> bool {
        matches!(self, Self::Manager | Self::Admin)
    }

    pub fn can_delete_device(self) -> bool {
        matches!(self, Self::Manager | Self::Admin)
    }

    pub fn can_create_project(self) -> bool {
        matches!(self, Self::Admin)
    }

    pub fn can_manage_users(self) -> bool {
        matches!(self, Self::Admin)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub project_id: String,
    pub username: String,
    pub role: ProjectRole,
}
