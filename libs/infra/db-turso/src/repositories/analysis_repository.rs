// [libs/infra/db-turso/src/repositories/analysis_repository.rs]
//! Only the latest artifact per (project, kind, device) is retained —
//! `upsert` always overwrites, there is no history table. Project-scoped
//! kinds store an empty string in the `device_name` column so the
//! primary key stays `NOT NULL` and a plain `ON CONFLICT` upsert works
//! without special-casing `NULL`.

use crate::client::DbClient;
use crate::errors::{from_json, to_json, DbError};
use crate::util::enum_to_str;
use libsql::{params, Row};
use meridian_domain_models::{AnalysisArtifact, AnalysisKind};
use tracing::instrument;

#[derive(Clone)]
pub struct AnalysisRepository {
    client: DbClient,
}

fn device_key(device_name: Option<&str>) -> &str {
    device_name.unwrap_or("")
}

impl AnalysisRepository {
    pub fn new(client: DbClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, artifact))]
    pub async fn upsert(&self, artifact: &AnalysisArtifact) -> Result<(), DbError> {
        let conn = self.client.get_connection()?;
        conn.execute(
            "INSERT INTO analysis_artifacts (project_id, kind, device_name, status, artifact_json, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(project_id, kind, device_name) DO UPDATE SET
                status = excluded.status,
                artifact_json = excluded.artifact_json,
                updated_at = excluded.updated_at",
            params![
                artifact.project_id.clone(),
                enum_to_str(&artifact.kind)?,
                device_key(artifact.device_name.as_deref()),
                enum_to_str(&artifact.status)?,
                to_json(artifact)?,
                artifact.updated_at.to_rfc3339()
            ],
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get(
        &self,
        project_id: &str,
        kind: AnalysisKind,
        device_name: Option<&str>,
    ) -> Result<Option<AnalysisArtifact>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT artifact_json FROM analysis_artifacts WHERE project_id = ?1 AND kind = ?2 AND device_name = ?3",
                params![project_id, enum_to_str(&kind)?, device_key(device_name)],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_artifact(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_for_project(&self, project_id: &str) -> Result<Vec<AnalysisArtifact>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT artifact_json FROM analysis_artifacts WHERE project_id = ?1 ORDER BY kind, device_name",
                params![project_id],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_artifact(&row)?);
        }
        Ok(out)
    }

    #[instrument(skip(self))]
    pub async fn delete_device_scoped(&self, project_id: &str, device_name: &str) -> Result<(), DbError> {
        let conn = self.client.get_connection()?;
        conn.execute(
            "DELETE FROM analysis_artifacts WHERE project_id = ?1 AND device_name = ?2",
            params![project_id, device_name],
        )
        .await?;
        Ok(())
    }
}

fn row_to_artifact(row: &Row) -> Result<AnalysisArtifact, DbError> {
    let artifact_json: String = row.get(0)?;
    from_json(&artifact_json)
}
