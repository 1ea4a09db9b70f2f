// [libs/infra/db-turso/src/repositories/mod.rs]
//! One repository per entity in the data model. Each holds a cloneable
//! [`crate::client::DbClient`] and opens a fresh connection per call
//! rather than per instance, so a repository can be cloned freely into
//! axum handler state without contending on a shared connection.

pub mod analysis_repository;
pub mod device_repository;
pub mod document_repository;
pub mod folder_repository;
pub mod image_repository;
pub mod marker_repository;
pub mod member_repository;
pub mod option_repository;
pub mod project_repository;
pub mod topology_repository;
pub mod user_repository;

pub use analysis_repository::AnalysisRepository;
pub use device_repository::DeviceRepository;
pub use document_repository::{DocumentRepository, UploadOutcome};
pub use folder_repository::FolderRepository;
pub use image_repository::DeviceImageRepository;
pub use marker_repository::MarkerRepository;
pub use member_repository::MemberRepository;
pub use option_repository::ProjectOptionRepository;
pub use project_repository::ProjectRepository;
pub use topology_repository::TopologyRepository;
pub use user_repository::UserRepository;
