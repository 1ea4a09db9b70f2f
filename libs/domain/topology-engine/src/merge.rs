// [libs/domain/topology-engine/src/merge.rs]
//! Builds the node/edge view `GET /topology` returns: the union of
//! parser-derived devices and AI-introduced node ids, with stored
//! label/role overrides applied and a deterministic edge fallback when no
//! topology artifact exists yet.

use crate::classify::classify_default_role;
use meridian_domain_models::{Link, NodeRole, TopologyState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyNode {
    pub id: String,
    pub label: String,
    pub role: NodeRole,
}

/// `ai_node_ids` are ids the most recent `project_topology` artifact
/// introduced that are not present in `device_names` (e.g. a WAN cloud or
/// an inferred upstream router the parser never saw a config for).
pub fn merge_nodes(device_names: &[String], ai_node_ids: &[String], state: &TopologyState) -> Vec<TopologyNode> {
    let mut ids: BTreeSet<String> = device_names.iter().cloned().collect();
    ids.extend(ai_node_ids.iter().cloned());

    ids.into_iter()
        .map(|id| {
            let role = state
                .node_roles
                .get(&id)
                .copied()
                .unwrap_or_else(|| classify_default_role(&id));
            let label = state.node_labels.get(&id).cloned().unwrap_or_else(|| id.clone());
            TopologyNode { id, label, role }
        })
        .collect()
}

/// Deterministic edge fallback used when no topology artifact exists:
/// every core node links to every distribution node, and every
/// distribution node links to every access node.
pub fn fallback_edges(nodes: &[TopologyNode]) -> Vec<Link> {
    let core: Vec<&TopologyNode> = nodes.iter().filter(|n| n.role == NodeRole::Core).collect();
    let dist: Vec<&TopologyNode> = nodes.iter().filter(|n| n.role == NodeRole::Distribution).collect();
    let access: Vec<&TopologyNode> = nodes.iter().filter(|n| n.role == NodeRole::Access).collect();

    let mut links = Vec::new();
    for c in &core {
        for d in &dist {
            links.push(Link {
                a: c.id.clone(),
                b: d.id.clone(),
                label: None,
                evidence: Some("role-classifier-fallback".to_string()),
                link_type: Some("core-dist".to_string()),
            });
        }
    }
    for d in &dist {
        for a in &access {
            links.push(Link {
                a: d.id.clone(),
                b: a.id.clone(),
                label: None,
                evidence: Some("role-classifier-fallback".to_string()),
                link_type: Some("dist-access".to_string()),
            });
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn state() -> TopologyState {
        TopologyState::empty("proj", Utc::now())
    }

    #[test]
    fn merges_device_and_ai_ids_deduped() {
        let devices = vec!["core-sw1".to_string(), "access-sw1".to_string()];
        let ai = vec!["access-sw1".to_string(), "wan-cloud".to_string()];
        let nodes = merge_nodes(&devices, &ai, &state());
        let ids: Vec<_> = nodes.iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids, vec!["access-sw1", "core-sw1", "wan-cloud"]);
    }

    #[test]
    fn override_role_wins_over_classifier() {
        let mut s = state();
        s.node_roles.insert("mystery-box".to_string(), NodeRole::Core);
        let nodes = merge_nodes(&["mystery-box".to_string()], &[], &s);
        assert_eq!(nodes[0].role, NodeRole::Core);
    }

    #[test]
    fn fallback_links_core_to_dist_to_access() {
        let devices = vec!["core-sw1".to_string(), "dist-sw1".to_string(), "access-sw1".to_string()];
        let nodes = merge_nodes(&devices, &[], &state());
        let links = fallback_edges(&nodes);
        assert_eq!(links.len(), 2);
    }
}
