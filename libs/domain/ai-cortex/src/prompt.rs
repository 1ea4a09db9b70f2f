// [libs/domain/ai-cortex/src/prompt.rs]
//! Composes the `{kind, project_context, device_context?, include_original?}`
//! payload the LLM adapter contract expects. Project-scoped kinds get a
//! whole-project summary; device-scoped kinds get a single-device record;
//! `device_config_drift` gets the two latest raw Config texts instead of a
//! parsed record, since the point is to ask the model what changed in the
//! source text itself.

use crate::errors::PromptError;
use meridian_domain_models::{AnalysisKind, DeviceRecord, Project};
use meridian_domain_summary_projector::SummaryRow;
use serde::Serialize;
use tracing::instrument;

#[derive(Debug, Clone, Serialize)]
pub struct PromptRequest {
    pub kind: AnalysisKind,
    pub project_context: String,
    pub device_context: Option<String>,
    pub include_original: bool,
}

/// Builds the project-wide context blob shared by `project_overview`,
/// `project_recommendations`, and `project_topology`.
pub fn project_context(project: &Project, rows: &[SummaryRow]) -> String {
    let devices_json = serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Project: {name}\nDescription: {description}\nVisibility: {visibility:?}\nDevice summary ({count} devices):\n{devices_json}",
        name = project.name,
        description = project.description,
        visibility = project.visibility,
        count = rows.len(),
    )
}

/// Builds the single-device context blob for `device_overview` and
/// `device_recommendations`.
pub fn device_context(record: &DeviceRecord, include_original: bool) -> String {
    let parsed_json = serde_json::to_string_pretty(record).unwrap_or_else(|_| "{}".to_string());
    if include_original {
        format!("Parsed device record:\n{parsed_json}\n\nOriginal configuration:\n{}", record.original_content)
    } else {
        format!("Parsed device record:\n{parsed_json}")
    }
}

/// Builds the two-version raw-text context blob for `device_config_drift`.
pub fn drift_context(device_name: &str, previous_raw: &str, current_raw: &str) -> String {
    format!(
        "Device: {device_name}\n\n--- Previous configuration ---\n{previous_raw}\n\n--- Current configuration ---\n{current_raw}"
    )
}

pub struct ComposeInput<'a> {
    pub kind: AnalysisKind,
    pub project: &'a Project,
    pub summary_rows: &'a [SummaryRow],
    pub device: Option<&'a DeviceRecord>,
    pub drift_versions: Option<(&'a str, &'a str)>,
    pub include_original: bool,
}

#[instrument(skip(input))]
pub fn compose(input: ComposeInput<'_>) -> Result<PromptRequest, PromptError> {
    let project_context = project_context(input.project, input.summary_rows);

    let device_context = match input.kind {
        AnalysisKind::DeviceOverview | AnalysisKind::DeviceRecommendations => {
            let record = input.device.ok_or(PromptError::MissingDeviceContext(input.kind))?;
            Some(device_context(record, input.include_original))
        }
        AnalysisKind::DeviceConfigDrift => {
            let (previous, current) = input.drift_versions.ok_or(PromptError::InsufficientDriftVersions(0))?;
            let device_name = input.device.map(|d| d.device_name.as_str()).unwrap_or("unknown");
            Some(drift_context(device_name, previous, current))
        }
        AnalysisKind::ProjectOverview | AnalysisKind::ProjectRecommendations | AnalysisKind::ProjectTopology => None,
    };

    Ok(PromptRequest {
        kind: input.kind,
        project_context,
        device_context,
        include_original: input.include_original,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use meridian_domain_models::ProjectVisibility;

    fn project() -> Project {
        Project {
            id: "p1".into(),
            name: "NetA".into(),
            visibility: ProjectVisibility::Private,
            description: "test project".into(),
            topo_url: None,
            backup_interval_hours: None,
            created_by: "alice".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn project_kind_omits_device_context() {
        let result = compose(ComposeInput {
            kind: AnalysisKind::ProjectOverview,
            project: &project(),
            summary_rows: &[],
            device: None,
            drift_versions: None,
            include_original: false,
        })
        .unwrap();
        assert!(result.device_context.is_none());
        assert!(result.project_context.contains("NetA"));
    }

    #[test]
    fn device_kind_without_device_errors() {
        let result = compose(ComposeInput {
            kind: AnalysisKind::DeviceOverview,
            project: &project(),
            summary_rows: &[],
            device: None,
            drift_versions: None,
            include_original: false,
        });
        assert!(result.is_err());
    }

    #[test]
    fn drift_kind_requires_both_versions() {
        let result = compose(ComposeInput {
            kind: AnalysisKind::DeviceConfigDrift,
            project: &project(),
            summary_rows: &[],
            device: None,
            drift_versions: Some(("old config", "new config")),
            include_original: false,
        })
        .unwrap();
        assert!(result.device_context.unwrap().contains("new config"));
    }
}
