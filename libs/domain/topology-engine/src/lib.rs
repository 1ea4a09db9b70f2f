// [libs/domain/topology-engine/src/lib.rs]
//! Topology layout store support: name-based role classification, the
//! node/edge merge between parsed devices and AI-generated topology, and
//! the overlap relaxation pass applied after LLM layout generation.

pub mod classify;
pub mod merge;
pub mod relax;

pub use classify::classify_default_role;
pub use merge::{fallback_edges, merge_nodes, TopologyNode};
pub use relax::{relax_overlaps, MAX_PASSES, MIN_DISTANCE};
