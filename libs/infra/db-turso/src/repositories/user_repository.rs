// [libs/infra/db-turso/src/repositories/user_repository.rs]
//! Platform-wide login identities. Distinct from project [`Member`]
//! rows — `is_admin` here gates `/users` management, nothing else.

use crate::client::DbClient;
use crate::errors::DbError;
use crate::util::parse_ts;
use libsql::params;
use meridian_domain_models::User;
use tracing::instrument;

#[derive(Clone)]
pub struct UserRepository {
    client: DbClient,
}

impl UserRepository {
    pub fn new(client: DbClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, user))]
    pub async fn create(&self, user: &User) -> Result<(), DbError> {
        let conn = self.client.get_connection()?;
        let affected = conn
            .execute(
                "INSERT OR IGNORE INTO users (username, password_hash, is_admin, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    user.username.clone(),
                    user.password_hash.clone(),
                    user.is_admin as i64,
                    user.created_at.to_rfc3339()
                ],
            )
            .await?;

        if affected == 0 {
            return Err(DbError::Conflict(format!("user `{}` already exists", user.username)));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, username: &str) -> Result<Option<User>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT username, password_hash, is_admin, created_at FROM users WHERE username = ?1",
                params![username],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query("SELECT username, password_hash, is_admin, created_at FROM users ORDER BY username", ())
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_user(&row)?);
        }
        Ok(out)
    }

    #[instrument(skip(self, new_password_hash))]
    pub async fn update_password(&self, username: &str, new_password_hash: &str) -> Result<(), DbError> {
        let conn = self.client.get_connection()?;
        let affected = conn
            .execute(
                "UPDATE users SET password_hash = ?2 WHERE username = ?1",
                params![username, new_password_hash],
            )
            .await?;

        if affected == 0 {
            return Err(DbError::not_found("user", username));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, username: &str) -> Result<(), DbError> {
        let conn = self.client.get_connection()?;
        let affected = conn.execute("DELETE FROM users WHERE username = ?1", params![username]).await?;
        if affected == 0 {
            return Err(DbError::not_found("user", username));
        }
        Ok(())
    }
}

fn row_to_user(row: &libsql::Row) -> Result<User, DbError> {
    let username: String = row.get(0)?;
    let password_hash: String = row.get(1)?;
    let is_admin: i64 = row.get(2)?;
    let created_at: String = row.get(3)?;

    Ok(User {
        username,
        password_hash,
        is_admin: is_admin != 0,
        created_at: parse_ts(&created_at)?,
    })
}
