// [libs/infra/db-turso/src/schema.rs]
/*!
 * Idempotent schema bootstrap. Every statement is `CREATE TABLE IF NOT
 * EXISTS` / `CREATE INDEX IF NOT EXISTS`, so `apply_schema` is safe to
 * call on every connect — there is no separate migration runner.
 *
 * Nested structures (a `DeviceRecord`'s interfaces, a `TopologyState`'s
 * position map, an `AnalysisArtifact`'s draft) are stored as a single
 * JSON column rather than normalized across tables: they are read and
 * written as whole documents by the domain crates, never queried by
 * sub-field from SQL, so normalizing them would only add join cost with
 * no corresponding access pattern to justify it.
 */

use crate::errors::DbError;
use libsql::Connection;
use tracing::{debug, info, instrument};

const TABLES: &[(&str, &str)] = &[
    ("users", r#"
        CREATE TABLE IF NOT EXISTS users (
            username TEXT PRIMARY KEY,
            password_hash TEXT NOT NULL,
            is_admin INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );
    "#),
    ("projects", r#"
        CREATE TABLE IF NOT EXISTS projects (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            visibility TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            topo_url TEXT,
            backup_interval_hours INTEGER,
            created_by TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
    "#),
    ("members", r#"
        CREATE TABLE IF NOT EXISTS members (
            project_id TEXT NOT NULL,
            username TEXT NOT NULL,
            role TEXT NOT NULL,
            PRIMARY KEY (project_id, username)
        );
    "#),
    ("folders", r#"
        CREATE TABLE IF NOT EXISTS folders (
            project_id TEXT NOT NULL,
            id TEXT NOT NULL,
            name TEXT NOT NULL,
            parent_id TEXT,
            deleted INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (project_id, id)
        );
    "#),
    ("documents", r#"
        CREATE TABLE IF NOT EXISTS documents (
            project_id TEXT NOT NULL,
            document_id TEXT NOT NULL,
            filename TEXT NOT NULL,
            folder_id TEXT NOT NULL,
            latest_version_number INTEGER NOT NULL,
            content_type TEXT NOT NULL,
            creator TEXT NOT NULL,
            created_at TEXT NOT NULL,
            device_name TEXT,
            deleted INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (project_id, document_id)
        );
    "#),
    ("document_versions", r#"
        CREATE TABLE IF NOT EXISTS document_versions (
            project_id TEXT NOT NULL,
            document_id TEXT NOT NULL,
            version_number INTEGER NOT NULL,
            blob_hash TEXT NOT NULL,
            size INTEGER NOT NULL,
            uploader TEXT NOT NULL,
            created_at TEXT NOT NULL,
            metadata_json TEXT NOT NULL,
            is_latest INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (document_id, version_number)
        );
    "#),
    ("device_records", r#"
        CREATE TABLE IF NOT EXISTS device_records (
            project_id TEXT NOT NULL,
            device_name TEXT NOT NULL,
            vendor TEXT NOT NULL,
            source_version INTEGER NOT NULL,
            record_json TEXT NOT NULL,
            PRIMARY KEY (project_id, device_name)
        );
    "#),
    ("analysis_artifacts", r#"
        CREATE TABLE IF NOT EXISTS analysis_artifacts (
            project_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            device_name TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL,
            artifact_json TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (project_id, kind, device_name)
        );
    "#),
    ("topology_states", r#"
        CREATE TABLE IF NOT EXISTS topology_states (
            project_id TEXT PRIMARY KEY,
            state_json TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    "#),
    ("in_flight_markers", r#"
        CREATE TABLE IF NOT EXISTS in_flight_markers (
            project_id TEXT NOT NULL,
            job_scope TEXT NOT NULL,
            device_name TEXT NOT NULL DEFAULT '',
            started_at TEXT NOT NULL,
            PRIMARY KEY (project_id, job_scope, device_name)
        );
    "#),
    ("project_options", r#"
        CREATE TABLE IF NOT EXISTS project_options (
            project_id TEXT NOT NULL,
            category TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY (project_id, category, value)
        );
    "#),
    ("device_images", r#"
        CREATE TABLE IF NOT EXISTS device_images (
            project_id TEXT NOT NULL,
            device_name TEXT NOT NULL,
            content_type TEXT NOT NULL,
            base64_data TEXT NOT NULL,
            PRIMARY KEY (project_id, device_name)
        );
    "#),
];

const INDEXES: &[(&str, &str)] = &[
    ("idx_documents_folder", "CREATE INDEX IF NOT EXISTS idx_documents_folder ON documents(project_id, folder_id);"),
    ("idx_documents_family", "CREATE INDEX IF NOT EXISTS idx_documents_family ON documents(project_id, filename, folder_id);"),
    ("idx_versions_latest", "CREATE INDEX IF NOT EXISTS idx_versions_latest ON document_versions(document_id, is_latest);"),
    ("idx_markers_project", "CREATE INDEX IF NOT EXISTS idx_markers_project ON in_flight_markers(project_id);"),
];

#[instrument(skip(conn))]
pub async fn apply_schema(conn: &Connection) -> Result<(), DbError> {
    info!("applying schema");
    for (name, sql) in TABLES {
        debug!(table = *name, "creating table");
        conn.execute(sql, ()).await?;
    }
    for (name, sql) in INDEXES {
        debug!(index = *name, "creating index");
        conn.execute(sql, ()).await?;
    }
    Ok(())
}
