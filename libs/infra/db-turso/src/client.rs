// [libs/infra/db-turso/src/client.rs]
/*!
 * Connection lifecycle for the libSQL-backed store.
 *
 * Local disk paths and `libsql://`/`https://` remote URLs are both
 * accepted; `:memory:` URLs additionally need an anchor connection kept
 * alive for the process lifetime, otherwise SQLite tears the in-memory
 * database down the moment the bootstrap connection closes and every
 * later `get_connection()` call sees an empty schema.
 */

use crate::errors::DbError;
use crate::schema::apply_schema;
use libsql::{Builder, Connection, Database};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct DbClient {
    database: Arc<Database>,
    /// Holds the in-memory database open for the client's lifetime. `None`
    /// for disk-backed and remote connections, which don't need one.
    _memory_anchor: Option<Arc<Connection>>,
}

impl DbClient {
    #[instrument(skip(auth_token))]
    pub async fn connect(url: &str, auth_token: Option<String>) -> Result<Self, DbError> {
        if url.is_empty() {
            return Err(DbError::ConfigurationError("DATABASE_URL is empty".into()));
        }

        let is_remote = url.starts_with("libsql://") || url.starts_with("https://");
        let is_memory = url.contains(":memory:") || url.contains("mode=memory");

        info!(url, is_remote, is_memory, "connecting to database");

        let database = if is_remote {
            let token = auth_token
                .ok_or_else(|| DbError::ConfigurationError("remote connection requires an auth token".into()))?;
            Builder::new_remote(url.to_string(), token).build().await
        } else {
            Builder::new_local(url).build().await
        }
        .map_err(|e| DbError::ConnectionError(e.to_string()))?;

        let database = Arc::new(database);

        let anchor = if is_memory {
            let conn = database.connect().map_err(|e| DbError::ConnectionError(e.to_string()))?;
            apply_schema(&conn).await?;
            Some(Arc::new(conn))
        } else {
            let conn = database.connect().map_err(|e| DbError::ConnectionError(e.to_string()))?;
            apply_schema(&conn).await?;
            None
        };

        Ok(Self { database, _memory_anchor: anchor })
    }

    pub fn get_connection(&self) -> Result<Connection, DbError> {
        self.database.connect().map_err(|e| DbError::ConnectionError(e.to_string()))
    }
}
