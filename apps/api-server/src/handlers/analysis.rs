// [apps/api-server/src/handlers/analysis.rs]
//! Analysis submission, polling, and verification. Submission always
//! returns immediately (`202` on success, `409 BUSY` if the project's
//! single slot is occupied) — the actual LLM round trip happens in
//! `JobController`'s background task; clients poll the matching `GET`.

use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use meridian_domain_ai_cortex::{compose, ComposeInput};
use meridian_domain_models::{AnalysisArtifact, AnalysisKind, AnalysisStatus, ProjectRole};
use meridian_domain_summary_projector::project_row;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::rbac::require_capability;
use crate::state::{AppState, SubmitOutcome};

#[derive(Serialize)]
pub struct SubmitResponse {
    pub accepted: bool,
}

async fn submit_project(state: &AppState, pid: &str, kind: AnalysisKind) -> Result<StatusCode, ApiError> {
    let project = state.projects.get(pid).await?.ok_or_else(|| ApiError::NotFound(format!("project `{pid}` not found")))?;
    let records = state.devices.list(pid).await?;
    let rows: Vec<_> = records.iter().map(project_row).collect();

    let request = compose(ComposeInput {
        kind,
        project: &project,
        summary_rows: &rows,
        device: None,
        drift_versions: None,
        include_original: false,
    })?;

    match state.jobs.submit(pid, kind, None, request, state.llm.clone()).await? {
        SubmitOutcome::Accepted => Ok(StatusCode::ACCEPTED),
        SubmitOutcome::Busy => Err(ApiError::Busy),
    }
}

async fn get_project(state: &AppState, pid: &str, kind: AnalysisKind) -> Result<Json<AnalysisArtifact>, ApiError> {
    let artifact = state.jobs.get(pid, kind, None).await?.ok_or_else(|| ApiError::NotFound("no analysis artifact yet".to_string()))?;
    Ok(Json(artifact))
}

async fn submit_device(state: &AppState, pid: &str, device_name: &str, kind: AnalysisKind) -> Result<StatusCode, ApiError> {
    let project = state.projects.get(pid).await?.ok_or_else(|| ApiError::NotFound(format!("project `{pid}` not found")))?;
    let record = state
        .devices
        .get(pid, device_name)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("device `{device_name}` not found")))?;

    let drift_versions;
    let request = if kind == AnalysisKind::DeviceConfigDrift {
        let versions = state.documents.list_config_versions_for_device(pid, device_name).await?;
        if versions.len() < 2 {
            return Err(ApiError::Validation("device-config-drift requires at least two uploaded versions".to_string()));
        }
        let current_bytes = state.blobs.get(&versions[0].blob_hash).await?;
        let previous_bytes = state.blobs.get(&versions[1].blob_hash).await?;
        let current = String::from_utf8_lossy(&current_bytes).into_owned();
        let previous = String::from_utf8_lossy(&previous_bytes).into_owned();
        drift_versions = Some((previous, current));

        compose(ComposeInput {
            kind,
            project: &project,
            summary_rows: &[],
            device: Some(&record),
            drift_versions: drift_versions.as_ref().map(|(p, c)| (p.as_str(), c.as_str())),
            include_original: false,
        })?
    } else {
        compose(ComposeInput {
            kind,
            project: &project,
            summary_rows: &[],
            device: Some(&record),
            drift_versions: None,
            include_original: true,
        })?
    };

    match state.jobs.submit(pid, kind, Some(device_name), request, state.llm.clone()).await? {
        SubmitOutcome::Accepted => Ok(StatusCode::ACCEPTED),
        SubmitOutcome::Busy => Err(ApiError::Busy),
    }
}

async fn get_device(state: &AppState, pid: &str, device_name: &str, kind: AnalysisKind) -> Result<Json<AnalysisArtifact>, ApiError> {
    let artifact = state
        .jobs
        .get(pid, kind, Some(device_name))
        .await?
        .ok_or_else(|| ApiError::NotFound("no analysis artifact yet".to_string()))?;
    Ok(Json(artifact))
}

macro_rules! project_kind_handlers {
    ($submit:ident, $get:ident, $kind:expr) => {
        pub async fn $submit(State(state): State<AppState>, Extension(caller): Extension<AuthUser>, Path(pid): Path<String>) -> Result<StatusCode, ApiError> {
            require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "submit analysis").await?;
            submit_project(&state, &pid, $kind).await
        }

        pub async fn $get(State(state): State<AppState>, Extension(caller): Extension<AuthUser>, Path(pid): Path<String>) -> Result<Json<AnalysisArtifact>, ApiError> {
            require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "view analysis results").await?;
            get_project(&state, &pid, $kind).await
        }
    };
}

macro_rules! device_kind_handlers {
    ($submit:ident, $get:ident, $kind:expr) => {
        pub async fn $submit(
            State(state): State<AppState>,
            Extension(caller): Extension<AuthUser>,
            Path((pid, name)): Path<(String, String)>,
        ) -> Result<StatusCode, ApiError> {
            require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "submit analysis").await?;
            submit_device(&state, &pid, &name, $kind).await
        }

        pub async fn $get(
            State(state): State<AppState>,
            Extension(caller): Extension<AuthUser>,
            Path((pid, name)): Path<(String, String)>,
        ) -> Result<Json<AnalysisArtifact>, ApiError> {
            require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "view analysis results").await?;
            get_device(&state, &pid, &name, $kind).await
        }
    };
}

project_kind_handlers!(submit_overview, get_overview, AnalysisKind::ProjectOverview);
project_kind_handlers!(submit_recommendations, get_recommendations, AnalysisKind::ProjectRecommendations);
project_kind_handlers!(submit_topology, get_topology, AnalysisKind::ProjectTopology);

device_kind_handlers!(submit_device_overview, get_device_overview, AnalysisKind::DeviceOverview);
device_kind_handlers!(submit_device_recommendations, get_device_recommendations, AnalysisKind::DeviceRecommendations);
device_kind_handlers!(submit_device_config_drift, get_device_config_drift, AnalysisKind::DeviceConfigDrift);

pub async fn analysis_full(State(state): State<AppState>, Extension(caller): Extension<AuthUser>, Path(pid): Path<String>) -> Result<Json<Vec<AnalysisArtifact>>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "view analysis results").await?;
    Ok(Json(state.jobs.list_for_project(&pid).await?))
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub verified_json: serde_json::Value,
    pub comments: Option<String>,
    pub status: AnalysisStatus,
}

fn parse_kind(raw: &str) -> Result<AnalysisKind, ApiError> {
    serde_json::from_value(serde_json::Value::String(raw.to_string())).map_err(|_| ApiError::Validation(format!("unknown analysis kind `{raw}`")))
}

pub async fn verify_project(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((pid, kind)): Path<(String, String)>,
    Json(body): Json<VerifyRequest>,
) -> Result<Json<AnalysisArtifact>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_edit_documents, "verify analysis results").await?;
    let kind = parse_kind(&kind)?;
    let artifact = state
        .jobs
        .verify(&pid, kind, None, body.verified_json, body.comments, body.status, &caller.username)
        .await?;
    Ok(Json(artifact))
}

pub async fn verify_device(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((pid, name, kind)): Path<(String, String, String)>,
    Json(body): Json<VerifyRequest>,
) -> Result<Json<AnalysisArtifact>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_edit_documents, "verify analysis results").await?;
    let kind = parse_kind(&kind)?;
    let artifact = state
        .jobs
        .verify(&pid, kind, Some(&name), body.verified_json, body.comments, body.status, &caller.username)
        .await?;
    Ok(Json(artifact))
}
