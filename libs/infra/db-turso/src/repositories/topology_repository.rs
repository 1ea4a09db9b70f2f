// [libs/infra/db-turso/src/repositories/topology_repository.rs]
//! `save` replaces the whole state wholesale — positions, links,
//! labels, and roles are never patched independently, matching the
//! last-writer-wins policy on topology layout writes.

use crate::client::DbClient;
use crate::errors::{from_json, to_json, DbError};
use crate::util::parse_ts;
use libsql::{params, Row};
use meridian_domain_models::TopologyState;
use tracing::instrument;

#[derive(Clone)]
pub struct TopologyRepository {
    client: DbClient,
}

impl TopologyRepository {
    pub fn new(client: DbClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, project_id: &str) -> Result<Option<TopologyState>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT state_json, updated_at FROM topology_states WHERE project_id = ?1",
                params![project_id],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_state(project_id, &row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, state))]
    pub async fn save(&self, state: &TopologyState) -> Result<(), DbError> {
        let conn = self.client.get_connection()?;
        conn.execute(
            "INSERT INTO topology_states (project_id, state_json, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(project_id) DO UPDATE SET state_json = excluded.state_json, updated_at = excluded.updated_at",
            params![state.project_id.clone(), to_json(state)?, state.updated_at.to_rfc3339()],
        )
        .await?;
        Ok(())
    }

    /// Drops `device_name` from positions, labels, roles, and any link
    /// that references it, then persists the result. A no-op if the
    /// project has no stored topology yet.
    #[instrument(skip(self))]
    pub async fn remove_node(&self, project_id: &str, device_name: &str) -> Result<(), DbError> {
        let Some(mut state) = self.get(project_id).await? else {
            return Ok(());
        };

        state.positions.remove(device_name);
        state.node_labels.remove(device_name);
        state.node_roles.remove(device_name);
        state.links.retain(|link| link.a != device_name && link.b != device_name);
        state.updated_at = chrono::Utc::now();

        self.save(&state).await
    }
}

fn row_to_state(project_id: &str, row: &Row) -> Result<TopologyState, DbError> {
    let state_json: String = row.get(0)?;
    let updated_at: String = row.get(1)?;
    let mut state: TopologyState = from_json(&state_json)?;
    state.project_id = project_id.to_string();
    state.updated_at = parse_ts(&updated_at)?;
    Ok(state)
}
