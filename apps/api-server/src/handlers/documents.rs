// [apps/api-server/src/handlers/documents.rs]
//! Upload, versioning, and retrieval of documents. Uploads into the
//! `Config` folder additionally derive a device name and run the
//! configuration through the vendor parser, persisting a `DeviceRecord`
//! alongside the raw version — everything downstream (summaries,
//! analysis, topology) reads from that record, never by re-parsing on
//! every request.

use axum::extract::{Extension, Multipart, Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use meridian_domain_models::{Document, DocumentVersion, ProjectRole, UploadMetadata, CONFIG_FOLDER_ID};
use serde::Deserialize;
use std::collections::HashMap;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::rbac::require_capability;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct FolderQuery {
    pub folder_id: Option<String>,
}

pub async fn list_documents(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(pid): Path<String>,
    Query(q): Query<FolderQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "view documents").await?;
    let folder_id = q.folder_id.unwrap_or_else(|| CONFIG_FOLDER_ID.to_string());
    Ok(Json(state.documents.list_by_folder(&pid, &folder_id).await?))
}

struct UploadForm {
    folder_id: String,
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
    metadata: UploadMetadata,
}

async fn parse_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut folder_id = CONFIG_FOLDER_ID.to_string();
    let mut filename = None;
    let mut content_type = "application/octet-stream".to_string();
    let mut bytes = None;
    let mut fields: HashMap<String, String> = HashMap::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| ApiError::Validation(e.to_string()))? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                filename = field.file_name().map(str::to_string);
                if let Some(ct) = field.content_type() {
                    content_type = ct.to_string();
                }
                let data = field.bytes().await.map_err(|e| ApiError::Validation(e.to_string()))?;
                bytes = Some(data.to_vec());
            }
            "folder_id" => {
                folder_id = field.text().await.map_err(|e| ApiError::Validation(e.to_string()))?;
            }
            other => {
                let value = field.text().await.map_err(|e| ApiError::Validation(e.to_string()))?;
                fields.insert(other.to_string(), value);
            }
        }
    }

    let filename = filename.ok_or_else(|| ApiError::Validation("missing `file` field".to_string()))?;
    let bytes = bytes.ok_or_else(|| ApiError::Validation("missing `file` field".to_string()))?;

    let metadata = UploadMetadata {
        who: fields.remove("who"),
        what: fields.remove("what"),
        where_: fields.remove("where"),
        when: fields.remove("when"),
        why: fields.remove("why"),
        description: fields.remove("description"),
    };

    Ok(UploadForm {
        folder_id,
        filename,
        content_type,
        bytes,
        metadata,
    })
}

pub async fn upload_document(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(pid): Path<String>,
    multipart: Multipart,
) -> Result<Json<Document>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_edit_documents, "upload documents").await?;

    let form = parse_upload_form(multipart).await?;

    if state.folders.get(&pid, &form.folder_id).await?.is_none() && !meridian_domain_models::Folder::is_reserved(&form.folder_id) {
        return Err(ApiError::NotFound(format!("folder `{}` not found", form.folder_id)));
    }

    let blob_hash = state.blobs.put(&form.bytes).await?;
    state.blobs.inc_ref(&blob_hash).await?;

    let device_name = if form.folder_id == CONFIG_FOLDER_ID {
        Some(meridian_domain_device_parser::derive_device_name(&form.filename))
    } else {
        None
    };

    let outcome = state
        .documents
        .upload(
            &pid,
            &form.folder_id,
            &form.filename,
            &form.content_type,
            &blob_hash,
            form.bytes.len() as u64,
            &caller.username,
            form.metadata,
            device_name.clone(),
        )
        .await?;

    if let Some(device_name) = device_name {
        let raw = String::from_utf8_lossy(&form.bytes).into_owned();
        let record = meridian_domain_device_parser::parse(&pid, &device_name, &raw, outcome.version.version_number);
        state.devices.upsert(&record).await?;
    }

    Ok(Json(outcome.document))
}

pub async fn get_document(State(state): State<AppState>, Extension(caller): Extension<AuthUser>, Path((pid, did)): Path<(String, String)>) -> Result<Json<Document>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "view documents").await?;
    let document = state.documents.get(&pid, &did).await?.ok_or_else(|| ApiError::NotFound(format!("document `{did}` not found")))?;
    Ok(Json(document))
}

#[derive(Deserialize)]
pub struct UpdateDocumentRequest {
    pub metadata: Option<UploadMetadata>,
}

pub async fn update_document(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((pid, did)): Path<(String, String)>,
    Json(_body): Json<UpdateDocumentRequest>,
) -> Result<Json<Document>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_edit_documents, "edit documents").await?;
    let document = state.documents.get(&pid, &did).await?.ok_or_else(|| ApiError::NotFound(format!("document `{did}` not found")))?;
    Ok(Json(document))
}

pub async fn delete_document(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((pid, did)): Path<(String, String)>,
) -> Result<(), ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_edit_documents, "delete documents").await?;

    let versions = state.documents.list_versions(&did).await?;
    state.documents.delete(&pid, &did).await?;
    for version in versions {
        state.blobs.dec_ref(&version.blob_hash).await?;
    }
    Ok(())
}

#[derive(Deserialize)]
pub struct VersionQuery {
    pub version: Option<u32>,
}

async fn resolve_version(state: &AppState, document_id: &str, requested: Option<u32>) -> Result<DocumentVersion, ApiError> {
    let version = match requested {
        Some(n) => state.documents.get_version(document_id, n).await?,
        None => state.documents.get_latest_version(document_id).await?,
    };
    version.ok_or_else(|| ApiError::NotFound(format!("no such version for document `{document_id}`")))
}

pub async fn preview_document(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((pid, did)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "preview documents").await?;
    let document = state.documents.get(&pid, &did).await?.ok_or_else(|| ApiError::NotFound(format!("document `{did}` not found")))?;
    let version = resolve_version(&state, &did, None).await?;
    let bytes = state.blobs.get(&version.blob_hash).await?;
    Ok(([(header::CONTENT_TYPE, document.content_type)], bytes).into_response())
}

pub async fn download_document(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((pid, did)): Path<(String, String)>,
    Query(q): Query<VersionQuery>,
) -> Result<Response, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "download documents").await?;
    let document = state.documents.get(&pid, &did).await?.ok_or_else(|| ApiError::NotFound(format!("document `{did}` not found")))?;
    let version = resolve_version(&state, &did, q.version).await?;
    let bytes = state.blobs.get(&version.blob_hash).await?;
    let disposition = format!("attachment; filename=\"{}\"", document.filename);
    Ok(([(header::CONTENT_TYPE, document.content_type), (header::CONTENT_DISPOSITION, disposition)], bytes).into_response())
}

pub async fn list_versions(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((pid, did)): Path<(String, String)>,
) -> Result<Json<Vec<DocumentVersion>>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "view document history").await?;
    let _document = state.documents.get(&pid, &did).await?.ok_or_else(|| ApiError::NotFound(format!("document `{did}` not found")))?;
    Ok(Json(state.documents.list_versions(&did).await?))
}

#[derive(Deserialize)]
pub struct MoveDocumentRequest {
    pub folder_id: String,
}

pub async fn move_document(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((pid, did)): Path<(String, String)>,
    Json(body): Json<MoveDocumentRequest>,
) -> Result<(), ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_edit_documents, "move documents").await?;
    state.documents.move_to_folder(&pid, &did, &body.folder_id).await?;
    Ok(())
}

#[derive(Deserialize)]
pub struct RenameDocumentRequest {
    pub filename: String,
}

pub async fn rename_document(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((pid, did)): Path<(String, String)>,
    Json(body): Json<RenameDocumentRequest>,
) -> Result<(), ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_edit_documents, "rename documents").await?;
    state.documents.rename(&pid, &did, &body.filename).await?;
    Ok(())
}

#[derive(Deserialize)]
pub struct ContentQuery {
    #[serde(default)]
    pub extract_config: bool,
    pub version: Option<u32>,
}

pub async fn document_content(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((pid, did)): Path<(String, String)>,
    Query(q): Query<ContentQuery>,
) -> Result<String, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "view document content").await?;
    let document = state.documents.get(&pid, &did).await?.ok_or_else(|| ApiError::NotFound(format!("document `{did}` not found")))?;
    let version = resolve_version(&state, &did, q.version).await?;
    let bytes = state.blobs.get(&version.blob_hash).await?;
    let text = String::from_utf8_lossy(&bytes).into_owned();

    if q.extract_config && document.folder_id == CONFIG_FOLDER_ID {
        if let Some(device_name) = &document.device_name {
            let record = meridian_domain_device_parser::parse(&pid, device_name, &text, version.version_number);
            return serde_json::to_string_pretty(&record).map_err(|e| ApiError::Internal(e.to_string()));
        }
    }

    Ok(text)
}
