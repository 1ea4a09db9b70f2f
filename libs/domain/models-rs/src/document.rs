// [libs/domain/models-rs/src/document.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The 5W+description bound to each version, not shared across versions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadMetadata {
    pub who: Option<String>,
    pub what: Option<String>,
    pub where_: Option<String>,
    pub when: Option<String>,
    pub why: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub project_id: String,
    pub document_id: String,
    pub filename: String,
    pub folder_id: String,
    pub latest_version_number: u32,
    pub content_type: String,
    pub creator: String,
    pub created_at: DateTime<Utc>,
    /// Only populated for documents in the `Config` folder.
    pub device_name: Option<String>,
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub document_id: String,
    pub version_number: u32,
    pub blob_hash: String,
    pub size: u64,
    pub uploader: String,
    pub created_at: DateTime<Utc>,
    pub metadata: UploadMetadata,
    pub is_latest: bool,
}
