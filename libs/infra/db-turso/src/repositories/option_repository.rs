// [libs/infra/db-turso/src/repositories/option_repository.rs]
//! Remembered upload-form dropdown values. `add` is silently idempotent
//! — re-adding an existing (project, category, value) is not an error,
//! since the UI calls this opportunistically whenever a user types a
//! new value into a combo box.

use crate::client::DbClient;
use crate::errors::DbError;
use crate::util::{enum_to_str, str_to_enum};
use libsql::{params, Row};
use meridian_domain_models::{OptionCategory, ProjectOption};
use tracing::instrument;

#[derive(Clone)]
pub struct ProjectOptionRepository {
    client: DbClient,
}

impl ProjectOptionRepository {
    pub fn new(client: DbClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, value))]
    pub async fn add(&self, project_id: &str, category: OptionCategory, value: &str) -> Result<(), DbError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DbError::Validation("option value must be non-empty".into()));
        }

        let conn = self.client.get_connection()?;
        conn.execute(
            "INSERT OR IGNORE INTO project_options (project_id, category, value) VALUES (?1, ?2, ?3)",
            params![project_id, enum_to_str(&category)?, trimmed],
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list(&self, project_id: &str) -> Result<Vec<ProjectOption>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT project_id, category, value FROM project_options WHERE project_id = ?1 ORDER BY category, value",
                params![project_id],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_option(&row)?);
        }
        Ok(out)
    }
}

fn row_to_option(row: &Row) -> Result<ProjectOption, DbError> {
    let project_id: String = row.get(0)?;
    let category: String = row.get(1)?;
    let value: String = row.get(2)?;

    Ok(ProjectOption { project_id, category: str_to_enum::<OptionCategory>(&category)?, value })
}
