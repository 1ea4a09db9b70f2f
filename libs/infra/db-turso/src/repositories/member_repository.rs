// [libs/infra/db-turso/src/repositories/member_repository.rs]
//! `admin` membership is protected at this layer, not just at the HTTP
//! boundary: `update_role` and `remove` both refuse to touch a row whose
//! current role is `admin`, so no caller can bypass the rule by missing
//! the check upstream.

use crate::client::DbClient;
use crate::errors::DbError;
use crate::util::{enum_to_str, str_to_enum};
use libsql::{params, Row};
use meridian_domain_models::{Member, ProjectRole};
use tracing::instrument;

#[derive(Clone)]
pub struct MemberRepository {
    client: DbClient,
}

impl MemberRepository {
    pub fn new(client: DbClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, member))]
    pub async fn add(&self, member: &Member) -> Result<(), DbError> {
        let conn = self.client.get_connection()?;
        let affected = conn
            .execute(
                "INSERT OR IGNORE INTO members (project_id, username, role) VALUES (?1, ?2, ?3)",
                params![member.project_id.clone(), member.username.clone(), enum_to_str(&member.role)?],
            )
            .await?;

        if affected == 0 {
            return Err(DbError::Conflict(format!(
                "`{}` is already a member of project `{}`",
                member.username, member.project_id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, project_id: &str, username: &str) -> Result<Option<Member>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT project_id, username, role FROM members WHERE project_id = ?1 AND username = ?2",
                params![project_id, username],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_member(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, project_id: &str) -> Result<Vec<Member>, DbError> {
        let conn = self.client.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT project_id, username, role FROM members WHERE project_id = ?1 ORDER BY username",
                params![project_id],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_member(&row)?);
        }
        Ok(out)
    }

    #[instrument(skip(self))]
    pub async fn update_role(&self, project_id: &str, username: &str, role: ProjectRole) -> Result<(), DbError> {
        let current = self
            .get(project_id, username)
            .await?
            .ok_or_else(|| DbError::not_found("member", format!("{project_id}/{username}")))?;

        if current.role == ProjectRole::Admin {
            return Err(DbError::Conflict("the admin member's role cannot be changed".into()));
        }

        let conn = self.client.get_connection()?;
        conn.execute(
            "UPDATE members SET role = ?3 WHERE project_id = ?1 AND username = ?2",
            params![project_id, username, enum_to_str(&role)?],
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, project_id: &str, username: &str) -> Result<(), DbError> {
        let current = self
            .get(project_id, username)
            .await?
            .ok_or_else(|| DbError::not_found("member", format!("{project_id}/{username}")))?;

        if current.role == ProjectRole::Admin {
            return Err(DbError::Conflict("the admin member cannot be removed".into()));
        }

        let conn = self.client.get_connection()?;
        conn.execute(
            "DELETE FROM members WHERE project_id = ?1 AND username = ?2",
            params![project_id, username],
        )
        .await?;
        Ok(())
    }
}

fn row_to_member(row: &Row) -> Result<Member, DbError> {
    let project_id: String = row.get(0)?;
    let username: String = row.get(1)?;
    let role: String = row.get(2)?;

    Ok(Member { project_id, username, role: str_to_enum::<ProjectRole>(&role)? })
}
