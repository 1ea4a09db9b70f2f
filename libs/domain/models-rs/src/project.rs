// [libs/domain/models-rs/src/project.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectVisibility {
    Private,
    Shared,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub visibility: ProjectVisibility,
    pub description: String,
    pub topo_url: Option<String>,
    /// Hint, in hours, for how often an external backup job should run.
    pub backup_interval_hours: Option<u32>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}
