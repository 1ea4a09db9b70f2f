// [libs/infra/db-turso/src/util.rs]
//! Small shared helpers: RFC 3339 timestamp round-tripping and
//! unit-enum-to-TEXT-column conversion built on the same `Serialize`/
//! `Deserialize` impls the domain models already carry, so adding a
//! variant to an enum never requires touching a matching SQL mapper.

use crate::errors::DbError;
use chrono::{DateTime, Utc};

pub(crate) fn parse_ts(s: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::MappingError(format!("bad timestamp `{s}`: {e}")))
}

pub(crate) fn enum_to_str<T: serde::Serialize>(value: &T) -> Result<String, DbError> {
    let json = serde_json::to_value(value).map_err(|e| DbError::MappingError(e.to_string()))?;
    json.as_str()
        .map(str::to_string)
        .ok_or_else(|| DbError::MappingError("enum did not serialize to a string".into()))
}

pub(crate) fn str_to_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DbError> {
    serde_json::from_value(serde_json::Value::String(s.to_string())).map_err(|e| DbError::MappingError(e.to_string()))
}
