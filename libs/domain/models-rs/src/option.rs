// [libs/domain/models-rs/src/option.rs]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum OptionCategory {
    What,
    Where,
    When,
    Why,
}

/// A remembered dropdown value for upload forms. Unique per
/// (project, category, value).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectOption {
    pub project_id: String,
    pub category: OptionCategory,
    pub value: String,
}
