// [libs/domain/models-rs/src/lib.rs]
//! Shared domain entities. Every type here is a plain serde DTO;
//! validation and persistence live in the crates that consume them.

pub mod analysis;
pub mod device;
pub mod device_image;
pub mod document;
pub mod folder;
pub mod member;
pub mod option;
pub mod project;
pub mod topology;
pub mod user;

pub use analysis::{AccuracyMetrics, AnalysisArtifact, AnalysisKind, AnalysisStatus, LlmMetrics, TokenUsage};
pub use device::{
    AllowedVlans, DeviceOverview, DeviceRecord, DeviceRole, HaState, Interface, MacArpTables,
    Neighbor, NeighborProtocol, PortMode, RoutingTable, SecurityPosture, StpState, Vendor,
    VlanTable,
};
pub use device_image::DeviceImage;
pub use document::{Document, DocumentVersion, UploadMetadata};
pub use folder::{Folder, CONFIG_FOLDER_ID, OTHER_FOLDER_ID};
pub use member::{Member, ProjectRole};
pub use option::{OptionCategory, ProjectOption};
pub use project::{Project, ProjectVisibility};
pub use topology::{InFlightMarker, Link, NodeRole, Position, TopologyState};
pub use user::User;
