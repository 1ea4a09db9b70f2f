// [libs/infra/db-turso/src/repositories/project_repository.rs]
//! Projects own every other entity in the data model; `delete` tears
//! down all of it in one transaction rather than leaving orphaned rows
//! for a background sweep to find.

use crate::client::DbClient;
use crate::errors::DbError;
use crate::util::{enum_to_str, parse_ts, str_to_enum};
use libsql::{params, Row};
use meridian_domain_models::{Project, ProjectVisibility};
use tracing::instrument;

#[derive(Clone)]
pub struct ProjectRepository {
    client: DbClient,
}

impl ProjectRepository {
    pub fn new(client: DbClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, project))]
    pub async fn create(&self, project: &Project) -> Result<(), DbError> {
        let conn = self.client.get_connection()?;
        conn.execute(
            "INSERT INTO projects (id, name, visibility, description, topo_url, backup_interval_hours, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                project.id.clone(),
                project.name.clone(),
                enum_to_str(&project.visibility)?,
                project.description.clone(),
                project.topo_url.clone(),
                project.backup_interval_hours.map(|h| h as i64),
                project.created_by.clone(),
                project.created_at.to_rfc3339()
            ],
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Option<Project>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT id, name, visibility, description, topo_url, backup_interval_hours, created_by, created_at
                 FROM projects WHERE id = ?1",
                params![id],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_project(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Project>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT id, name, visibility, description, topo_url, backup_interval_hours, created_by, created_at
                 FROM projects ORDER BY created_at",
                (),
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_project(&row)?);
        }
        Ok(out)
    }

    #[instrument(skip(self, project))]
    pub async fn update(&self, project: &Project) -> Result<(), DbError> {
        let conn = self.client.get_connection()?;
        let affected = conn
            .execute(
                "UPDATE projects SET name = ?2, visibility = ?3, description = ?4, topo_url = ?5, backup_interval_hours = ?6
                 WHERE id = ?1",
                params![
                    project.id.clone(),
                    project.name.clone(),
                    enum_to_str(&project.visibility)?,
                    project.description.clone(),
                    project.topo_url.clone(),
                    project.backup_interval_hours.map(|h| h as i64)
                ],
            )
            .await?;

        if affected == 0 {
            return Err(DbError::not_found("project", &project.id));
        }
        Ok(())
    }

    /// Deletes the project and every row in every table that references
    /// it. Document bytes in the blob store are not touched here — the
    /// caller is responsible for `unref`-ing each version's blob hash
    /// before or after this call, since the blob store lives outside
    /// this crate's transaction.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), DbError> {
        let conn = self.client.get_connection()?;
        let tx = conn.transaction().await.map_err(|_| DbError::TransactionError)?;

        tx.execute(
            "DELETE FROM document_versions WHERE document_id IN (SELECT document_id FROM documents WHERE project_id = ?1)",
            params![id],
        )
        .await?;
        tx.execute("DELETE FROM documents WHERE project_id = ?1", params![id]).await?;
        tx.execute("DELETE FROM folders WHERE project_id = ?1", params![id]).await?;
        tx.execute("DELETE FROM members WHERE project_id = ?1", params![id]).await?;
        tx.execute("DELETE FROM device_records WHERE project_id = ?1", params![id]).await?;
        tx.execute("DELETE FROM analysis_artifacts WHERE project_id = ?1", params![id]).await?;
        tx.execute("DELETE FROM topology_states WHERE project_id = ?1", params![id]).await?;
        tx.execute("DELETE FROM in_flight_markers WHERE project_id = ?1", params![id]).await?;
        tx.execute("DELETE FROM project_options WHERE project_id = ?1", params![id]).await?;
        tx.execute("DELETE FROM device_images WHERE project_id = ?1", params![id]).await?;
        let affected = tx.execute("DELETE FROM projects WHERE id = ?1", params![id]).await?;

        tx.commit().await.map_err(|_| DbError::TransactionError)?;

        if affected == 0 {
            return Err(DbError::not_found("project", id));
        }
        Ok(())
    }
}

fn row_to_project(row: &Row) -> Result<Project, DbError> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let visibility: String = row.get(2)?;
    let description: String = row.get(3)?;
    let topo_url: Option<String> = row.get(4)?;
    let backup_interval_hours: Option<i64> = row.get(5)?;
    let created_by: String = row.get(6)?;
    let created_at: String = row.get(7)?;

    Ok(Project {
        id,
        name,
        visibility: str_to_enum::<ProjectVisibility>(&visibility)?,
        description,
        topo_url,
        backup_interval_hours: backup_interval_hours.map(|h| h as u32),
        created_by,
        created_at: parse_ts(&created_at)?,
    })
}
