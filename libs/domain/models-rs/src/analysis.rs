// [libs/domain/models-rs/src/analysis.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    ProjectOverview,
    ProjectRecommendations,
    ProjectTopology,
    DeviceOverview,
    DeviceRecommendations,
    DeviceConfigDrift,
}

impl AnalysisKind {
    /// Project-scoped kinds take a whole-project prompt; device-scoped
    /// kinds require a `device_name`.
    pub fn is_device_scoped(self) -> bool {
        matches!(
            self,
            Self::DeviceOverview | Self::DeviceRecommendations | Self::DeviceConfigDrift
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    PendingReview,
    Verified,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt: u32,
    pub completion: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmMetrics {
    pub model_name: String,
    pub inference_time_ms: u64,
    pub token_usage: TokenUsage,
}

/// Field-by-field diff between `ai_draft_json` and `verified_json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    pub total_changes: u32,
    /// Count of changes grouped by the JSON pointer's top-level field name.
    pub changes_by_type: std::collections::BTreeMap<String, u32>,
    pub key_changes: Vec<String>,
    pub accuracy_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisArtifact {
    pub project_id: String,
    pub kind: AnalysisKind,
    pub device_name: Option<String>,
    pub ai_draft_json: serde_json::Value,
    pub ai_draft_text: String,
    pub status: AnalysisStatus,
    pub verified_json: Option<serde_json::Value>,
    pub reviewer: Option<String>,
    pub comments: Option<String>,
    pub llm_metrics: LlmMetrics,
    pub accuracy_metrics: Option<AccuracyMetrics>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
