// [apps/api-server/src/handlers/topology.rs]
//! Topology retrieval and layout persistence. `GET /topology` merges the
//! parser-derived device set with whatever the last `project_topology`
//! analysis introduced and falls back to role-classified edges when no
//! links have been generated yet; `GET /network-topology` skips the
//! analysis-artifact lookup for callers that only need the DB-backed
//! node/edge shape.

use axum::extract::{Extension, Path, State};
use axum::Json;
use chrono::Utc;
use meridian_domain_models::{AnalysisKind, Link, ProjectRole, TopologyState};
use meridian_domain_topology_engine::{fallback_edges, merge_nodes, TopologyNode};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::rbac::require_capability;
use crate::state::AppState;

#[derive(Serialize)]
pub struct TopologyView {
    pub nodes: Vec<TopologyNode>,
    pub links: Vec<Link>,
    pub positions: std::collections::BTreeMap<String, meridian_domain_models::Position>,
    pub updated_at: chrono::DateTime<Utc>,
}

async fn ai_node_ids(state: &AppState, project_id: &str) -> Result<Vec<String>, ApiError> {
    let artifact = state.jobs.get(project_id, AnalysisKind::ProjectTopology, None).await?;
    let Some(artifact) = artifact else {
        return Ok(Vec::new());
    };
    #[derive(Deserialize)]
    struct DraftNode {
        id: String,
    }
    #[derive(Deserialize, Default)]
    struct Draft {
        #[serde(default)]
        nodes: Vec<DraftNode>,
    }
    let draft: Draft = serde_json::from_value(artifact.ai_draft_json).unwrap_or_default();
    Ok(draft.nodes.into_iter().map(|n| n.id).collect())
}

async fn build_view(state: &AppState, project_id: &str) -> Result<TopologyView, ApiError> {
    let records = state.devices.list(project_id).await?;
    let device_names: Vec<String> = records.into_iter().map(|r| r.device_name).collect();
    let ai_ids = ai_node_ids(state, project_id).await?;

    let stored = state.topology.get(project_id).await?;
    let topology_state = stored.unwrap_or_else(|| TopologyState::empty(project_id, Utc::now()));

    let nodes = merge_nodes(&device_names, &ai_ids, &topology_state);
    let links = if topology_state.links.is_empty() {
        fallback_edges(&nodes)
    } else {
        topology_state.links.clone()
    };

    Ok(TopologyView {
        nodes,
        links,
        positions: topology_state.positions,
        updated_at: topology_state.updated_at,
    })
}

pub async fn get_topology(State(state): State<AppState>, Extension(caller): Extension<AuthUser>, Path(pid): Path<String>) -> Result<Json<TopologyView>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "view the topology").await?;
    Ok(Json(build_view(&state, &pid).await?))
}

pub async fn get_network_topology(State(state): State<AppState>, Extension(caller): Extension<AuthUser>, Path(pid): Path<String>) -> Result<Json<TopologyState>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_read, "view the topology").await?;
    let state_row = state.topology.get(&pid).await?.unwrap_or_else(|| TopologyState::empty(&pid, Utc::now()));
    Ok(Json(state_row))
}

#[derive(Deserialize)]
pub struct PutLayoutRequest {
    pub positions: std::collections::BTreeMap<String, meridian_domain_models::Position>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub node_labels: std::collections::BTreeMap<String, String>,
    #[serde(default)]
    pub node_roles: std::collections::BTreeMap<String, meridian_domain_models::NodeRole>,
}

pub async fn put_layout(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(pid): Path<String>,
    Json(body): Json<PutLayoutRequest>,
) -> Result<Json<TopologyState>, ApiError> {
    require_capability(&state, &pid, &caller.username, ProjectRole::can_edit_documents, "edit the topology layout").await?;

    let topology_state = TopologyState {
        project_id: pid,
        positions: body.positions,
        links: body.links,
        node_labels: body.node_labels,
        node_roles: body.node_roles,
        updated_at: Utc::now(),
    };
    state.topology.save(&topology_state).await?;
    Ok(Json(topology_state))
}
