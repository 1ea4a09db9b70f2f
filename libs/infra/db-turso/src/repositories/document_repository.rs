// [libs/infra/db-turso/src/repositories/document_repository.rs]
//! The version chain: uploading the same (project, filename, folder_id)
//! appends a version to the existing family instead of creating a new
//! one, and the previous `is_latest` row is demoted in the same
//! transaction that inserts the new one — no caller ever observes two
//! latest versions for a family.

use crate::client::DbClient;
use crate::errors::{from_json, to_json, DbError};
use crate::util::parse_ts;
use libsql::{params, Row};
use meridian_domain_models::{Document, DocumentVersion, UploadMetadata, CONFIG_FOLDER_ID, OTHER_FOLDER_ID};
use tracing::instrument;
use uuid::Uuid;

#[derive(Clone)]
pub struct DocumentRepository {
    client: DbClient,
}

pub struct UploadOutcome {
    pub document: Document,
    pub version: DocumentVersion,
}

impl DocumentRepository {
    pub fn new(client: DbClient) -> Self {
        Self { client }
    }

    #[allow(clippy::too_many_arguments)]
    #[instrument(skip(self, metadata))]
    pub async fn upload(
        &self,
        project_id: &str,
        folder_id: &str,
        filename: &str,
        content_type: &str,
        blob_hash: &str,
        size: u64,
        uploader: &str,
        metadata: UploadMetadata,
        device_name: Option<String>,
    ) -> Result<UploadOutcome, DbError> {
        let conn = self.client.get_connection()?;
        let tx = conn.transaction().await.map_err(|_| DbError::TransactionError)?;
        let now = chrono::Utc::now();
        let metadata_json = to_json(&metadata)?;

        let existing = {
            let mut rows = tx
                .query(
                    "SELECT project_id, document_id, filename, folder_id, latest_version_number, content_type, creator, created_at, device_name, deleted
                     FROM documents WHERE project_id = ?1 AND filename = ?2 AND folder_id = ?3",
                    params![project_id, filename, folder_id],
                )
                .await?;
            match rows.next().await? {
                Some(row) => Some(row_to_document(&row)?),
                None => None,
            }
        };

        let (document, version) = match existing {
            Some(mut document) => {
                let version_number = document.latest_version_number + 1;
                tx.execute(
                    "UPDATE document_versions SET is_latest = 0 WHERE document_id = ?1 AND is_latest = 1",
                    params![document.document_id.clone()],
                )
                .await?;
                tx.execute(
                    "INSERT INTO document_versions (project_id, document_id, version_number, blob_hash, size, uploader, created_at, metadata_json, is_latest)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1)",
                    params![
                        project_id,
                        document.document_id.clone(),
                        version_number as i64,
                        blob_hash,
                        size as i64,
                        uploader,
                        now.to_rfc3339(),
                        metadata_json.clone()
                    ],
                )
                .await?;
                tx.execute(
                    "UPDATE documents SET latest_version_number = ?2 WHERE document_id = ?1",
                    params![document.document_id.clone(), version_number as i64],
                )
                .await?;
                document.latest_version_number = version_number;

                let version = DocumentVersion {
                    document_id: document.document_id.clone(),
                    version_number,
                    blob_hash: blob_hash.to_string(),
                    size,
                    uploader: uploader.to_string(),
                    created_at: now,
                    metadata,
                    is_latest: true,
                };
                (document, version)
            }
            None => {
                let document_id = Uuid::new_v4().to_string();
                let document = Document {
                    project_id: project_id.to_string(),
                    document_id: document_id.clone(),
                    filename: filename.to_string(),
                    folder_id: folder_id.to_string(),
                    latest_version_number: 1,
                    content_type: content_type.to_string(),
                    creator: uploader.to_string(),
                    created_at: now,
                    device_name: device_name.clone(),
                    deleted: false,
                };
                tx.execute(
                    "INSERT INTO documents (project_id, document_id, filename, folder_id, latest_version_number, content_type, creator, created_at, device_name, deleted)
                     VALUES (?1, ?2, ?3, ?4, 1, ?5, ?6, ?7, ?8, 0)",
                    params![
                        project_id,
                        document_id.clone(),
                        filename,
                        folder_id,
                        content_type,
                        uploader,
                        now.to_rfc3339(),
                        device_name
                    ],
                )
                .await?;
                tx.execute(
                    "INSERT INTO document_versions (project_id, document_id, version_number, blob_hash, size, uploader, created_at, metadata_json, is_latest)
                     VALUES (?1, ?2, 1, ?3, ?4, ?5, ?6, ?7, 1)",
                    params![
                        project_id,
                        document_id.clone(),
                        blob_hash,
                        size as i64,
                        uploader,
                        now.to_rfc3339(),
                        metadata_json
                    ],
                )
                .await?;

                let version = DocumentVersion {
                    document_id,
                    version_number: 1,
                    blob_hash: blob_hash.to_string(),
                    size,
                    uploader: uploader.to_string(),
                    created_at: now,
                    metadata,
                    is_latest: true,
                };
                (document, version)
            }
        };

        tx.commit().await.map_err(|_| DbError::TransactionError)?;
        Ok(UploadOutcome { document, version })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, project_id: &str, document_id: &str) -> Result<Option<Document>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT project_id, document_id, filename, folder_id, latest_version_number, content_type, creator, created_at, device_name, deleted
                 FROM documents WHERE project_id = ?1 AND document_id = ?2 AND deleted = 0",
                params![project_id, document_id],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_document(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_by_folder(&self, project_id: &str, folder_id: &str) -> Result<Vec<Document>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT project_id, document_id, filename, folder_id, latest_version_number, content_type, creator, created_at, device_name, deleted
                 FROM documents WHERE project_id = ?1 AND folder_id = ?2 AND deleted = 0 ORDER BY created_at",
                params![project_id, folder_id],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_document(&row)?);
        }
        Ok(out)
    }

    /// All `Config`-folder documents whose inferred `device_name` matches,
    /// newest first — used to fetch the two latest raw versions for
    /// `device_config_drift` prompts.
    #[instrument(skip(self))]
    pub async fn list_config_versions_for_device(
        &self,
        project_id: &str,
        device_name: &str,
    ) -> Result<Vec<DocumentVersion>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT dv.document_id, dv.version_number, dv.blob_hash, dv.size, dv.uploader, dv.created_at, dv.metadata_json, dv.is_latest
                 FROM document_versions dv
                 JOIN documents d ON d.document_id = dv.document_id
                 WHERE d.project_id = ?1 AND d.folder_id = ?2 AND d.device_name = ?3 AND d.deleted = 0
                 ORDER BY dv.version_number DESC",
                params![project_id, CONFIG_FOLDER_ID, device_name],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_version(&row)?);
        }
        Ok(out)
    }

    #[instrument(skip(self))]
    pub async fn get_version(&self, document_id: &str, version_number: u32) -> Result<Option<DocumentVersion>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT document_id, version_number, blob_hash, size, uploader, created_at, metadata_json, is_latest
                 FROM document_versions WHERE document_id = ?1 AND version_number = ?2",
                params![document_id, version_number as i64],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_version(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_latest_version(&self, document_id: &str) -> Result<Option<DocumentVersion>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT document_id, version_number, blob_hash, size, uploader, created_at, metadata_json, is_latest
                 FROM document_versions WHERE document_id = ?1 AND is_latest = 1",
                params![document_id],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_version(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_versions(&self, document_id: &str) -> Result<Vec<DocumentVersion>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT document_id, version_number, blob_hash, size, uploader, created_at, metadata_json, is_latest
                 FROM document_versions WHERE document_id = ?1 ORDER BY version_number ASC",
                params![document_id],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_version(&row)?);
        }
        Ok(out)
    }

    #[instrument(skip(self, new_filename))]
    pub async fn rename(&self, project_id: &str, document_id: &str, new_filename: &str) -> Result<(), DbError> {
        let trimmed = new_filename.trim();
        if trimmed.is_empty() {
            return Err(DbError::Validation("filename must be non-empty".into()));
        }

        let conn = self.client.get_connection()?;
        let affected = conn
            .execute(
                "UPDATE documents SET filename = ?3 WHERE project_id = ?1 AND document_id = ?2 AND deleted = 0",
                params![project_id, document_id, trimmed],
            )
            .await?;

        if affected == 0 {
            return Err(DbError::not_found("document", document_id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn move_to_folder(&self, project_id: &str, document_id: &str, new_folder_id: &str) -> Result<(), DbError> {
        let document = self
            .get(project_id, document_id)
            .await?
            .ok_or_else(|| DbError::not_found("document", document_id))?;

        if new_folder_id == CONFIG_FOLDER_ID || new_folder_id == OTHER_FOLDER_ID {
            return Err(DbError::Validation(format!("documents cannot be moved into `{new_folder_id}`")));
        }
        if document.folder_id == CONFIG_FOLDER_ID {
            return Err(DbError::Validation("documents cannot be moved out of Config".into()));
        }

        let conn = self.client.get_connection()?;
        conn.execute(
            "UPDATE documents SET folder_id = ?3 WHERE project_id = ?1 AND document_id = ?2",
            params![project_id, document_id, new_folder_id],
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, project_id: &str, document_id: &str) -> Result<(), DbError> {
        let conn = self.client.get_connection()?;
        let affected = conn
            .execute(
                "UPDATE documents SET deleted = 1 WHERE project_id = ?1 AND document_id = ?2 AND deleted = 0",
                params![project_id, document_id],
            )
            .await?;

        if affected == 0 {
            return Err(DbError::not_found("document", document_id));
        }
        Ok(())
    }
}

fn row_to_document(row: &Row) -> Result<Document, DbError> {
    let project_id: String = row.get(0)?;
    let document_id: String = row.get(1)?;
    let filename: String = row.get(2)?;
    let folder_id: String = row.get(3)?;
    let latest_version_number: i64 = row.get(4)?;
    let content_type: String = row.get(5)?;
    let creator: String = row.get(6)?;
    let created_at: String = row.get(7)?;
    let device_name: Option<String> = row.get(8)?;
    let deleted: i64 = row.get(9)?;

    Ok(Document {
        project_id,
        document_id,
        filename,
        folder_id,
        latest_version_number: latest_version_number as u32,
        content_type,
        creator,
        created_at: parse_ts(&created_at)?,
        device_name,
        deleted: deleted != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_domain_models::UploadMetadata;

    fn metadata() -> UploadMetadata {
        UploadMetadata {
            who: Some("alice".into()),
            what: None,
            where_: None,
            when: None,
            why: None,
            description: None,
        }
    }

    async fn repo() -> DocumentRepository {
        let client = DbClient::connect(":memory:", None).await.unwrap();
        DocumentRepository::new(client)
    }

    #[tokio::test]
    async fn reupload_of_same_family_appends_a_version_and_demotes_the_prior_latest() {
        let repo = repo().await;

        let first = repo
            .upload("p1", CONFIG_FOLDER_ID, "core-sw1.txt", "text/plain", "hash-v1", 10, "alice", metadata(), Some("core-sw1".into()))
            .await
            .unwrap();
        assert_eq!(first.version.version_number, 1);
        assert!(first.version.is_latest);

        let second = repo
            .upload("p1", CONFIG_FOLDER_ID, "core-sw1.txt", "text/plain", "hash-v2", 20, "alice", metadata(), Some("core-sw1".into()))
            .await
            .unwrap();
        assert_eq!(second.document.document_id, first.document.document_id, "same (project, filename, folder) is one family");
        assert_eq!(second.version.version_number, 2);
        assert!(second.version.is_latest);

        let versions = repo.list_versions(&first.document.document_id).await.unwrap();
        assert_eq!(versions.len(), 2);
        assert_eq!(versions.iter().filter(|v| v.is_latest).count(), 1, "exactly one version is latest");
        assert_eq!(versions[0].version_number, 1);
        assert!(!versions[0].is_latest);
        assert_eq!(versions[1].version_number, 2);
    }

    #[tokio::test]
    async fn move_out_of_config_is_rejected() {
        let repo = repo().await;
        let outcome = repo
            .upload("p1", CONFIG_FOLDER_ID, "core-sw1.txt", "text/plain", "hash-v1", 10, "alice", metadata(), Some("core-sw1".into()))
            .await
            .unwrap();

        let err = repo.move_to_folder("p1", &outcome.document.document_id, "my-docs").await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn move_into_config_or_other_is_rejected() {
        let repo = repo().await;
        let outcome = repo
            .upload("p1", "my-docs", "diagram.pdf", "application/pdf", "hash-v1", 10, "alice", metadata(), None)
            .await
            .unwrap();

        assert!(matches!(
            repo.move_to_folder("p1", &outcome.document.document_id, CONFIG_FOLDER_ID).await,
            Err(DbError::Validation(_))
        ));
        assert!(matches!(
            repo.move_to_folder("p1", &outcome.document.document_id, OTHER_FOLDER_ID).await,
            Err(DbError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn delete_soft_deletes_and_hides_from_listings_while_versions_remain() {
        let repo = repo().await;
        let outcome = repo
            .upload("p1", "my-docs", "diagram.pdf", "application/pdf", "hash-v1", 10, "alice", metadata(), None)
            .await
            .unwrap();

        repo.delete("p1", &outcome.document.document_id).await.unwrap();

        assert!(repo.get("p1", &outcome.document.document_id).await.unwrap().is_none());
        assert!(repo.list_by_folder("p1", "my-docs").await.unwrap().is_empty());
        assert_eq!(repo.list_versions(&outcome.document.document_id).await.unwrap().len(), 1, "versions survive for audit");
    }
}

fn row_to_version(row: &Row) -> Result<DocumentVersion, DbError> {
    let document_id: String = row.get(0)?;
    let version_number: i64 = row.get(1)?;
    let blob_hash: String = row.get(2)?;
    let size: i64 = row.get(3)?;
    let uploader: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    let metadata_json: String = row.get(6)?;
    let is_latest: i64 = row.get(7)?;

    Ok(DocumentVersion {
        document_id,
        version_number: version_number as u32,
        blob_hash,
        size: size as u64,
        uploader,
        created_at: parse_ts(&created_at)?,
        metadata: from_json(&metadata_json)?,
        is_latest: is_latest != 0,
    })
}
