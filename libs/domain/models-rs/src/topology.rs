// [libs/domain/models-rs/src/topology.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    Core,
    Distribution,
    Access,
    Router,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub a: String,
    pub b: String,
    pub label: Option<String>,
    pub evidence: Option<String>,
    #[serde(rename = "type")]
    pub link_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyState {
    pub project_id: String,
    pub positions: BTreeMap<String, Position>,
    pub links: Vec<Link>,
    pub node_labels: BTreeMap<String, String>,
    pub node_roles: BTreeMap<String, NodeRole>,
    pub updated_at: DateTime<Utc>,
}

impl TopologyState {
    pub fn empty(project_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            project_id: project_id.into(),
            positions: BTreeMap::new(),
            links: Vec::new(),
            node_labels: BTreeMap::new(),
            node_roles: BTreeMap::new(),
            updated_at: now,
        }
    }
}

/// Durable marker indicating an LLM job is outstanding for
/// (project, job-scope). At most one exists per pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InFlightMarker {
    pub project_id: String,
    pub job_scope: super::AnalysisKind,
    pub started_at: DateTime<Utc>,
}
