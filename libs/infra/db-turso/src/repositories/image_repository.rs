// [libs/infra/db-turso/src/repositories/image_repository.rs]
//! Topology node icons, carried inline as base64 rather than through the
//! blob store — see [`meridian_domain_models::DeviceImage`] for why.

use crate::client::DbClient;
use crate::errors::DbError;
use libsql::{params, Row};
use meridian_domain_models::DeviceImage;
use tracing::instrument;

#[derive(Clone)]
pub struct DeviceImageRepository {
    client: DbClient,
}

impl DeviceImageRepository {
    pub fn new(client: DbClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, image))]
    pub async fn put(&self, image: &DeviceImage) -> Result<(), DbError> {
        let conn = self.client.get_connection()?;
        conn.execute(
            "INSERT INTO device_images (project_id, device_name, content_type, base64_data) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(project_id, device_name) DO UPDATE SET content_type = excluded.content_type, base64_data = excluded.base64_data",
            params![
                image.project_id.clone(),
                image.device_name.clone(),
                image.content_type.clone(),
                image.base64_data.clone()
            ],
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, project_id: &str, device_name: &str) -> Result<Option<DeviceImage>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT project_id, device_name, content_type, base64_data FROM device_images WHERE project_id = ?1 AND device_name = ?2",
                params![project_id, device_name],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_image(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, project_id: &str, device_name: &str) -> Result<(), DbError> {
        let conn = self.client.get_connection()?;
        conn.execute(
            "DELETE FROM device_images WHERE project_id = ?1 AND device_name = ?2",
            params![project_id, device_name],
        )
        .await?;
        Ok(())
    }
}

fn row_to_image(row: &Row) -> Result<DeviceImage, DbError> {
    Ok(DeviceImage {
        project_id: row.get(0)?,
        device_name: row.get(1)?,
        content_type: row.get(2)?,
        base64_data: row.get(3)?,
    })
}
