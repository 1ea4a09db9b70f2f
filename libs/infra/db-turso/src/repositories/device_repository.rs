// [libs/infra/db-turso/src/repositories/device_repository.rs]
//! `DeviceRecord`s are overwritten in place, never versioned — the data
//! model keeps only the latest parse per (project, device_name); the raw
//! upload history lives in the document store instead.

use crate::client::DbClient;
use crate::errors::{from_json, to_json, DbError};
use crate::util::enum_to_str;
use libsql::{params, Row};
use meridian_domain_models::DeviceRecord;
use tracing::instrument;

#[derive(Clone)]
pub struct DeviceRepository {
    client: DbClient,
}

impl DeviceRepository {
    pub fn new(client: DbClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, record))]
    pub async fn upsert(&self, record: &DeviceRecord) -> Result<(), DbError> {
        let conn = self.client.get_connection()?;
        conn.execute(
            "INSERT INTO device_records (project_id, device_name, vendor, source_version, record_json)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(project_id, device_name) DO UPDATE SET
                vendor = excluded.vendor,
                source_version = excluded.source_version,
                record_json = excluded.record_json",
            params![
                record.project_id.clone(),
                record.device_name.clone(),
                enum_to_str(&record.vendor)?,
                record.source_version as i64,
                to_json(record)?
            ],
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, project_id: &str, device_name: &str) -> Result<Option<DeviceRecord>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT record_json FROM device_records WHERE project_id = ?1 AND device_name = ?2",
                params![project_id, device_name],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, project_id: &str) -> Result<Vec<DeviceRecord>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT record_json FROM device_records WHERE project_id = ?1 ORDER BY device_name",
                params![project_id],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_record(&row)?);
        }
        Ok(out)
    }

    /// Removes the device record and its image. Device-scoped analysis
    /// artifacts and the topology node are cleaned up by the caller via
    /// [`crate::repositories::AnalysisRepository::delete_device_scoped`]
    /// and [`crate::repositories::TopologyRepository::remove_node`] —
    /// both need a read-modify-write the simple row delete here can't do.
    #[instrument(skip(self))]
    pub async fn delete(&self, project_id: &str, device_name: &str) -> Result<(), DbError> {
        let conn = self.client.get_connection()?;
        let affected = conn
            .execute(
                "DELETE FROM device_records WHERE project_id = ?1 AND device_name = ?2",
                params![project_id, device_name],
            )
            .await?;
        conn.execute(
            "DELETE FROM device_images WHERE project_id = ?1 AND device_name = ?2",
            params![project_id, device_name],
        )
        .await?;

        if affected == 0 {
            return Err(DbError::not_found("device", device_name));
        }
        Ok(())
    }
}

fn row_to_record(row: &Row) -> Result<DeviceRecord, DbError> {
    let record_json: String = row.get(0)?;
    from_json(&record_json)
}
