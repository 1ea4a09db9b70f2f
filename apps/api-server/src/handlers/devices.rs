// [apps/api-server/src/handlers/devices.rs]
//! Parsed-device views: the config-summary table, dashboard metrics, a
//! single device's full record, its topology icon, and its raw config
//! history.

use axum::extract::{Extension, Path, State};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use meridian_domain_models::{DeviceImage, DeviceRecord, DeviceRole, ProjectRole};
use meridian_domain_summary_projector::{detect_drift, project_row, rollup, DashboardMetrics, DeviceStatus, SummaryRow};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::rbac::require_capability;
use crate::state::AppState;

fn device_role_of(record: &DeviceRecord) -> DeviceRole {
    record.device_overview.role.unwrap_or(DeviceRole::Unknown)
}

/// Projects every device in the project, applying drift detection by
/// re-parsing the previous Config upload and comparing summary rows.
/// Drift is sticky in the sense that it is recomputed on every read, not
/// cleared by acknowledgment — see the open question recorded in
/// `DESIGN.md`.
async fn build_summary(state: &AppState, project_id: &str) -> Result<(Vec<SummaryRow>, Vec<DeviceRole>), ApiError> {
    let records = state.devices.list(project_id).await?;
    let mut rows = Vec::with_capacity(records.len());
    let mut roles = Vec::with_capacity(records.len());

    for record in &records {
        let mut row = project_row(record);
        roles.push(device_role_of(record));

        let versions = state.documents.list_config_versions_for_device(project_id, &record.device_name).await?;
        if let Some(previous_version) = versions.get(1) {
            let previous_bytes = state.blobs.get(&previous_version.blob_hash).await?;
            let previous_raw = String::from_utf8_lossy(&previous_bytes).into_owned();
            let previous_record = meridian_domain_device_parser::parse(project_id, &record.device_name, &previous_raw, previous_version.version_number);
            let previous_row = project_row(&previous_record);
            if row.status == DeviceStatus::Ok && detect_drift(&previous_row, &row) {
                row.status = DeviceStatus::Drift;
            }
        }

        rows.push(row);
    }

    Ok((rows, roles))
}

pub async fn config_summary(State(state): State<AppState>, Extension(caller): Extension<AuthUser>, Path(pid): Path<String>) -> Result<Json<Vec<SummaryRow>>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "view the configuration summary").await?;
    let (rows, _roles) = build_summary(&state, &pid).await?;
    Ok(Json(rows))
}

pub async fn summary_metrics(State(state): State<AppState>, Extension(caller): Extension<AuthUser>, Path(pid): Path<String>) -> Result<Json<DashboardMetrics>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "view summary metrics").await?;
    let (rows, roles) = build_summary(&state, &pid).await?;
    Ok(Json(rollup(&rows, &roles)))
}

pub async fn get_device(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((pid, name)): Path<(String, String)>,
) -> Result<Json<DeviceRecord>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "view device detail").await?;
    let record = state.devices.get(&pid, &name).await?.ok_or_else(|| ApiError::NotFound(format!("device `{name}` not found")))?;
    Ok(Json(record))
}

pub async fn delete_device(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((pid, name)): Path<(String, String)>,
) -> Result<(), ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_delete_device, "delete devices").await?;

    state.devices.delete(&pid, &name).await?;
    state.analysis.delete_device_scoped(&pid, &name).await?;
    state.topology.remove_node(&pid, &name).await?;
    Ok(())
}

pub async fn get_device_image(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((pid, name)): Path<(String, String)>,
) -> Result<Json<DeviceImage>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "view device icons").await?;
    let image = state.images.get(&pid, &name).await?.ok_or_else(|| ApiError::NotFound(format!("no icon set for device `{name}`")))?;
    Ok(Json(image))
}

#[derive(Deserialize)]
pub struct PutDeviceImageRequest {
    pub content_type: String,
    pub base64_data: String,
}

const MAX_IMAGE_BYTES: usize = 1_572_864;

pub async fn put_device_image(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((pid, name)): Path<(String, String)>,
    Json(body): Json<PutDeviceImageRequest>,
) -> Result<Json<DeviceImage>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_edit_documents, "set device icons").await?;

    if !matches!(body.content_type.as_str(), "image/png" | "image/jpeg") {
        return Err(ApiError::Validation("icon content type must be image/png or image/jpeg".to_string()));
    }
    let decoded = BASE64_STANDARD.decode(&body.base64_data).map_err(|e| ApiError::Validation(format!("invalid base64: {e}")))?;
    if decoded.len() > MAX_IMAGE_BYTES {
        return Err(ApiError::TooLarge("device icon must be under 1.5MB".to_string()));
    }

    let image = DeviceImage {
        project_id: pid,
        device_name: name,
        content_type: body.content_type,
        base64_data: body.base64_data,
    };
    state.images.put(&image).await?;
    Ok(Json(image))
}

pub async fn device_configs(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((pid, name)): Path<(String, String)>,
) -> Result<Json<Vec<meridian_domain_models::DocumentVersion>>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "view device configuration history").await?;
    Ok(Json(state.documents.list_config_versions_for_device(&pid, &name).await?))
}
