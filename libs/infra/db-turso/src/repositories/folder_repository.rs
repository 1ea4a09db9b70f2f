// [libs/infra/db-turso/src/repositories/folder_repository.rs]
//! `Config` and `Other` are never persisted unless a caller explicitly
//! renames/deletes them (which is rejected) — `list` and `get` synthesize
//! them on the fly when no row exists, per [`Folder::synthesize_reserved`].

use crate::client::DbClient;
use crate::errors::DbError;
use libsql::{params, Row};
use meridian_domain_models::{Folder, CONFIG_FOLDER_ID, OTHER_FOLDER_ID};
use tracing::instrument;
use uuid::Uuid;

#[derive(Clone)]
pub struct FolderRepository {
    client: DbClient,
}

impl FolderRepository {
    pub fn new(client: DbClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, project_id: &str) -> Result<Vec<Folder>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT project_id, id, name, parent_id, deleted FROM folders WHERE project_id = ?1 AND deleted = 0 ORDER BY name",
                params![project_id],
            )
            .await?;

        let mut out = Vec::new();
        let mut seen_config = false;
        let mut seen_other = false;
        while let Some(row) = rows.next().await? {
            let folder = row_to_folder(&row)?;
            seen_config |= folder.id == CONFIG_FOLDER_ID;
            seen_other |= folder.id == OTHER_FOLDER_ID;
            out.push(folder);
        }

        if !seen_config {
            out.push(Folder::synthesize_reserved(project_id, CONFIG_FOLDER_ID));
        }
        if !seen_other {
            out.push(Folder::synthesize_reserved(project_id, OTHER_FOLDER_ID));
        }
        Ok(out)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, project_id: &str, folder_id: &str) -> Result<Option<Folder>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT project_id, id, name, parent_id, deleted FROM folders WHERE project_id = ?1 AND id = ?2 AND deleted = 0",
                params![project_id, folder_id],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            return Ok(Some(row_to_folder(&row)?));
        }

        if Folder::is_reserved(folder_id) {
            return Ok(Some(Folder::synthesize_reserved(project_id, folder_id)));
        }
        Ok(None)
    }

    #[instrument(skip(self, name))]
    pub async fn create(&self, project_id: &str, name: &str, parent_id: Option<&str>) -> Result<Folder, DbError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DbError::Validation("folder name must be non-empty".into()));
        }
        if trimmed == CONFIG_FOLDER_ID || trimmed == OTHER_FOLDER_ID {
            return Err(DbError::Conflict(format!("`{trimmed}` is a reserved folder name")));
        }
        if parent_id == Some(CONFIG_FOLDER_ID) {
            return Err(DbError::Validation("new folders cannot be created inside Config".into()));
        }

        let folder = Folder {
            project_id: project_id.to_string(),
            id: Uuid::new_v4().to_string(),
            name: trimmed.to_string(),
            parent_id: parent_id.map(str::to_string),
            deleted: false,
        };

        let conn = self.client.get_connection()?;
        conn.execute(
            "INSERT INTO folders (project_id, id, name, parent_id, deleted) VALUES (?1, ?2, ?3, ?4, 0)",
            params![folder.project_id.clone(), folder.id.clone(), folder.name.clone(), folder.parent_id.clone()],
        )
        .await?;

        Ok(folder)
    }

    #[instrument(skip(self, name))]
    pub async fn rename(
        &self,
        project_id: &str,
        folder_id: &str,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<(), DbError> {
        if Folder::is_reserved(folder_id) {
            return Err(DbError::Conflict(format!("`{folder_id}` cannot be renamed")));
        }
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DbError::Validation("folder name must be non-empty".into()));
        }
        if let Some(parent) = parent_id {
            if self.creates_cycle(project_id, folder_id, parent).await? {
                return Err(DbError::Conflict("that move would create a folder cycle".into()));
            }
        }

        let conn = self.client.get_connection()?;
        let affected = conn
            .execute(
                "UPDATE folders SET name = ?3, parent_id = ?4 WHERE project_id = ?1 AND id = ?2 AND deleted = 0",
                params![project_id, folder_id, trimmed, parent_id],
            )
            .await?;

        if affected == 0 {
            return Err(DbError::not_found("folder", folder_id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, project_id: &str, folder_id: &str) -> Result<(), DbError> {
        if Folder::is_reserved(folder_id) {
            return Err(DbError::Conflict(format!("`{folder_id}` cannot be deleted")));
        }

        let conn = self.client.get_connection()?;
        let affected = conn
            .execute(
                "UPDATE folders SET deleted = 1 WHERE project_id = ?1 AND id = ?2 AND deleted = 0",
                params![project_id, folder_id],
            )
            .await?;

        if affected == 0 {
            return Err(DbError::not_found("folder", folder_id));
        }
        Ok(())
    }

    /// Walks the parent chain starting at `candidate_parent`; `true` if it
    /// ever reaches `folder_id`, which would make `folder_id` its own
    /// ancestor once the rename lands.
    async fn creates_cycle(&self, project_id: &str, folder_id: &str, candidate_parent: &str) -> Result<bool, DbError> {
        let mut current = candidate_parent.to_string();
        loop {
            if current == folder_id {
                return Ok(true);
            }
            if Folder::is_reserved(&current) {
                return Ok(false);
            }
            match self.get(project_id, &current).await? {
                Some(folder) => match folder.parent_id {
                    Some(parent) => current = parent,
                    None => return Ok(false),
                },
                None => return Ok(false),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repo() -> FolderRepository {
        let client = DbClient::connect(":memory:", None).await.unwrap();
        FolderRepository::new(client)
    }

    #[tokio::test]
    async fn config_and_other_are_synthesized_even_with_no_rows() {
        let repo = repo().await;
        let folders = repo.list("p1").await.unwrap();
        let ids: Vec<_> = folders.iter().map(|f| f.id.as_str()).collect();
        assert!(ids.contains(&CONFIG_FOLDER_ID));
        assert!(ids.contains(&OTHER_FOLDER_ID));
    }

    #[tokio::test]
    async fn reserved_folders_cannot_be_created_renamed_or_deleted() {
        let repo = repo().await;
        assert!(matches!(repo.create("p1", "Config", None).await, Err(DbError::Conflict(_))));
        assert!(matches!(repo.rename("p1", CONFIG_FOLDER_ID, "Renamed", None).await, Err(DbError::Conflict(_))));
        assert!(matches!(repo.delete("p1", OTHER_FOLDER_ID).await, Err(DbError::Conflict(_))));
    }

    #[tokio::test]
    async fn folders_cannot_be_created_inside_config() {
        let repo = repo().await;
        let err = repo.create("p1", "MyDocs", Some(CONFIG_FOLDER_ID)).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn renaming_a_folder_under_its_own_descendant_is_rejected_as_a_cycle() {
        let repo = repo().await;
        let a = repo.create("p1", "A", None).await.unwrap();
        let b = repo.create("p1", "B", Some(&a.id)).await.unwrap();

        let err = repo.rename("p1", &a.id, "A", Some(&b.id)).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_is_soft_and_hidden_from_listing() {
        let repo = repo().await;
        let folder = repo.create("p1", "Scratch", None).await.unwrap();
        repo.delete("p1", &folder.id).await.unwrap();

        let listed = repo.list("p1").await.unwrap();
        assert!(!listed.iter().any(|f| f.id == folder.id));
    }
}

fn row_to_folder(row: &Row) -> Result<Folder, DbError> {
    let project_id: String = row.get(0)?;
    let id: String = row.get(1)?;
    let name: String = row.get(2)?;
    let parent_id: Option<String> = row.get(3)?;
    let deleted: i64 = row.get(4)?;

    Ok(Folder { project_id, id, name, parent_id, deleted: deleted != 0 })
}
