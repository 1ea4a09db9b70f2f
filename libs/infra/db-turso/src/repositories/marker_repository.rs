// [libs/infra/db-turso/src/repositories/marker_repository.rs]
//! Backs the analysis job controller's single-slot-per-project rule: the
//! busy check in [`MarkerRepository::try_acquire`] looks for *any*
//! in-flight marker row for the project, regardless of kind or device —
//! not just a matching (kind, device) pair — since the queue depth per
//! project is exactly one no matter what it's queued for.

use crate::client::DbClient;
use crate::errors::DbError;
use crate::util::{enum_to_str, parse_ts, str_to_enum};
use libsql::{params, Row};
use meridian_domain_models::{AnalysisKind, InFlightMarker};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct MarkerRepository {
    client: DbClient,
}

impl MarkerRepository {
    pub fn new(client: DbClient) -> Self {
        Self { client }
    }

    /// Attempts to claim the project's single job slot. Returns `true`
    /// if a marker was created, `false` if one already existed for this
    /// project (any kind, any device).
    #[instrument(skip(self))]
    pub async fn try_acquire(
        &self,
        project_id: &str,
        job_scope: AnalysisKind,
        device_name: Option<&str>,
    ) -> Result<bool, DbError> {
        let conn = self.client.get_connection()?;
        let tx = conn.transaction().await.map_err(|_| DbError::TransactionError)?;

        let mut rows = tx
            .query("SELECT COUNT(*) FROM in_flight_markers WHERE project_id = ?1", params![project_id])
            .await?;
        let count: i64 = rows.next().await?.map(|row| row.get::<i64>(0)).transpose()?.unwrap_or(0);

        if count > 0 {
            tx.commit().await.map_err(|_| DbError::TransactionError)?;
            debug!(project_id, "job slot busy");
            return Ok(false);
        }

        tx.execute(
            "INSERT INTO in_flight_markers (project_id, job_scope, device_name, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                project_id,
                enum_to_str(&job_scope)?,
                device_name.unwrap_or(""),
                chrono::Utc::now().to_rfc3339()
            ],
        )
        .await?;
        tx.commit().await.map_err(|_| DbError::TransactionError)?;

        debug!(project_id, ?job_scope, "job slot acquired");
        Ok(true)
    }

    #[instrument(skip(self))]
    pub async fn clear(&self, project_id: &str, job_scope: AnalysisKind, device_name: Option<&str>) -> Result<(), DbError> {
        let conn = self.client.get_connection()?;
        conn.execute(
            "DELETE FROM in_flight_markers WHERE project_id = ?1 AND job_scope = ?2 AND device_name = ?3",
            params![project_id, enum_to_str(&job_scope)?, device_name.unwrap_or("")],
        )
        .await?;
        Ok(())
    }

    /// The single active marker for this project, if any.
    #[instrument(skip(self))]
    pub async fn get_active(&self, project_id: &str) -> Result<Option<InFlightMarker>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT project_id, job_scope, started_at FROM in_flight_markers WHERE project_id = ?1 LIMIT 1",
                params![project_id],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_marker(&row)?)),
            None => Ok(None),
        }
    }
}

fn row_to_marker(row: &Row) -> Result<InFlightMarker, DbError> {
    let project_id: String = row.get(0)?;
    let job_scope: String = row.get(1)?;
    let started_at: String = row.get(2)?;

    Ok(InFlightMarker {
        project_id,
        job_scope: str_to_enum::<AnalysisKind>(&job_scope)?,
        started_at: parse_ts(&started_at)?,
    })
}
