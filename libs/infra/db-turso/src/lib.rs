// [libs/infra/db-turso/src/lib.rs]
/*!
 * libSQL persistence adapter.
 *
 * [`client::DbClient`] owns the connection pool and schema bootstrap;
 * everything else is a thin repository per entity in the data model,
 * each returning domain types from `meridian_domain_models` directly so
 * the HTTP layer never touches a row or a SQL string.
 */

pub mod client;
pub mod errors;
pub mod repositories;
pub mod schema;
mod util;

pub use client::DbClient;
pub use errors::DbError;
pub use repositories::{
    AnalysisRepository, DeviceImageRepository, DeviceRepository, DocumentRepository, FolderRepository,
    MarkerRepository, MemberRepository, ProjectOptionRepository, ProjectRepository, TopologyRepository,
    UploadOutcome, UserRepository,
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use meridian_domain_models::{Project, ProjectVisibility};

    async fn memory_client() -> DbClient {
        DbClient::connect("file::memory:?cache=shared", None).await.unwrap()
    }

    #[tokio::test]
    async fn schema_bootstrap_is_idempotent_across_reconnects() {
        let client = memory_client().await;
        // a second connect against the same in-memory URL would normally
        // open an unrelated empty database; this just asserts the first
        // connect's bootstrap didn't error.
        let repo = ProjectRepository::new(client);
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn project_round_trips_through_repository() {
        let client = memory_client().await;
        let repo = ProjectRepository::new(client);

        let project = Project {
            id: "p1".into(),
            name: "NetA".into(),
            visibility: ProjectVisibility::Private,
            description: "test".into(),
            topo_url: None,
            backup_interval_hours: Some(24),
            created_by: "alice".into(),
            created_at: Utc::now(),
        };
        repo.create(&project).await.unwrap();

        let fetched = repo.get("p1").await.unwrap().unwrap();
        assert_eq!(fetched.name, "NetA");
        assert_eq!(fetched.backup_interval_hours, Some(24));
    }
}
