// [apps/api-server/src/state/mod.rs]
//! Application state composition. Every repository wraps the same
//! `DbClient` handle, so cloning `AppState` is cheap — it only clones
//! `Arc`s and the repository wrapper structs themselves.

mod job_controller;

pub use job_controller::{JobController, SubmitOutcome};

use std::sync::Arc;

use meridian_core_blobstore::BlobStore;
use meridian_infra_db::{
    AnalysisRepository, DbClient, DeviceImageRepository, DeviceRepository, DocumentRepository, FolderRepository,
    MarkerRepository, MemberRepository, ProjectOptionRepository, ProjectRepository, TopologyRepository, UserRepository,
};
use meridian_infra_llm_client::LlmAdapter;

use crate::auth::SessionRegistry;

#[derive(Clone)]
pub struct AppState {
    pub projects: ProjectRepository,
    pub members: MemberRepository,
    pub folders: FolderRepository,
    pub documents: DocumentRepository,
    pub devices: DeviceRepository,
    pub analysis: AnalysisRepository,
    pub topology: TopologyRepository,
    pub options: ProjectOptionRepository,
    pub images: DeviceImageRepository,
    pub users: UserRepository,
    pub blobs: Arc<BlobStore>,
    pub llm: Arc<dyn LlmAdapter>,
    pub sessions: Arc<SessionRegistry>,
    pub jobs: Arc<JobController>,
}

impl AppState {
    pub fn new(db: DbClient, blobs: BlobStore, llm: Arc<dyn LlmAdapter>) -> Self {
        let analysis = AnalysisRepository::new(db.clone());
        let marker = MarkerRepository::new(db.clone());
        let topology = TopologyRepository::new(db.clone());

        let jobs = Arc::new(JobController::new(marker.clone(), analysis.clone(), topology.clone()));

        Self {
            projects: ProjectRepository::new(db.clone()),
            members: MemberRepository::new(db.clone()),
            folders: FolderRepository::new(db.clone()),
            documents: DocumentRepository::new(db.clone()),
            devices: DeviceRepository::new(db.clone()),
            analysis,
            topology,
            options: ProjectOptionRepository::new(db.clone()),
            images: DeviceImageRepository::new(db.clone()),
            users: UserRepository::new(db),
            blobs: Arc::new(blobs),
            llm,
            sessions: Arc::new(SessionRegistry::new()),
            jobs,
        }
    }
}
