// [apps/api-server/src/config.rs]
//! Startup configuration, read once from the environment per `spec.md`
//! §6 ("no other environment variables affect core behavior").
//! `dotenvy::dotenv()` is called by `main` before this runs, so a local
//! `.env` in development populates the same variables.

use std::env;

pub struct Config {
    pub database_url: String,
    pub turso_auth_token: Option<String>,
    pub port: u16,
    pub llm_endpoint_url: Option<String>,
    pub llm_api_key: Option<String>,
    pub blob_storage_root: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:meridian.db".to_string()),
            turso_auth_token: env::var("TURSO_AUTH_TOKEN").ok(),
            port: env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8080),
            llm_endpoint_url: env::var("LLM_ENDPOINT_URL").ok(),
            llm_api_key: env::var("LLM_API_KEY").ok(),
            blob_storage_root: env::var("BLOB_STORAGE_ROOT").unwrap_or_else(|_| "./data/blobs".to_string()),
        }
    }
}
