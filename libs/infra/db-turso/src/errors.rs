// [libs/infra/db-turso/src/errors.rs]
//! Error catalog for the persistence layer. Variants map 1:1 onto the
//! error taxonomy the HTTP surface translates into status codes —
//! `NotFound` to 404, `Conflict` to 409, `Validation` to 400, the rest to
//! 500 — so handlers never need to inspect message text.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("database connection failed: {0}")]
    ConnectionError(String),

    #[error("database configuration invalid: {0}")]
    ConfigurationError(String),

    #[error("query failed: {0}")]
    QueryError(#[from] libsql::Error),

    #[error("row failed to map onto domain type: {0}")]
    MappingError(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("transaction failed to commit")]
    TransactionError,
}

impl DbError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { entity, id: id.into() }
    }
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<String, DbError> {
    serde_json::to_string(value).map_err(|e| DbError::MappingError(e.to_string()))
}

pub(crate) fn from_json<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, DbError> {
    serde_json::from_str(text).map_err(|e| DbError::MappingError(e.to_string()))
}
