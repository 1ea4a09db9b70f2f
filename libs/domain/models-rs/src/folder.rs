// [libs/domain/models-rs/src/folder.rs]
use serde::{Deserialize, Serialize};

/// Reserved folder that holds exactly the device configuration files.
pub const CONFIG_FOLDER_ID: &str = "Config";
/// Reserved virtual folder for documents whose folder_id does not resolve.
pub const OTHER_FOLDER_ID: &str = "Other";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub project_id: String,
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub deleted: bool,
}

impl Folder {
    pub fn is_reserved(id: &str) -> bool {
        id == CONFIG_FOLDER_ID || id == OTHER_FOLDER_ID
    }

    pub fn synthesize_reserved(project_id: &str, id: &str) -> Folder {
        Folder {
            project_id: project_id.to_string(),
            id: id.to_string(),
            name: id.to_string(),
            parent_id: None,
            deleted: false,
        }
    }
}
