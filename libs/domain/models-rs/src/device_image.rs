// [libs/domain/models-rs/src/device_image.rs]
use serde::{Deserialize, Serialize};

/// Topology node icon. At most one per (project, device_name). The image
/// bytes are carried as base64 inline with the record rather than through
/// the blob store, since icons are small and read far more often than
/// written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceImage {
    pub project_id: String,
    pub device_name: String,
    /// `image/png` or `image/jpeg`.
    pub content_type: String,
    pub base64_data: String,
}
