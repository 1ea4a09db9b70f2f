// [apps/api-server/src/main.rs]
//! Process entry point: load configuration, connect the database and
//! blob store, pick an LLM adapter, seed the first admin user if none
//! exists, and serve the router built in `routes.rs`.

use std::net::SocketAddr;
use std::sync::Arc;

use meridian_api_server::{build_router, AppState, Config};
use meridian_core_blobstore::BlobStore;
use meridian_infra_db::DbClient;
use meridian_infra_llm_client::{LlmAdapter, MockLlmAdapter, ReqwestLlmAdapter};
use meridian_domain_models::User;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    meridian_shared_telemetry::init_tracing("meridian-api-server");

    let config = Config::from_env();

    let db = DbClient::connect(&config.database_url, config.turso_auth_token.clone()).await?;
    let blobs = BlobStore::open(&config.blob_storage_root).await?;

    let llm: Arc<dyn LlmAdapter> = match (&config.llm_endpoint_url, &config.llm_api_key) {
        (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => {
            info!(url, "using reqwest LLM adapter");
            Arc::new(ReqwestLlmAdapter::new(url.clone(), key.clone())?)
        }
        _ => {
            warn!("LLM_ENDPOINT_URL/LLM_API_KEY not both set; falling back to the mock adapter");
            Arc::new(MockLlmAdapter::default())
        }
    };

    let state = AppState::new(db, blobs, llm);
    seed_initial_admin(&state).await?;

    let router = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Bootstraps a single admin login from `ADMIN_USERNAME`/`ADMIN_PASSWORD`
/// when the users table is empty, so a fresh deployment isn't locked
/// out before anyone can call `/login`. No-op once any user exists.
async fn seed_initial_admin(state: &AppState) -> anyhow::Result<()> {
    if !state.users.list().await?.is_empty() {
        return Ok(());
    }

    let (Ok(username), Ok(password)) = (std::env::var("ADMIN_USERNAME"), std::env::var("ADMIN_PASSWORD")) else {
        warn!("no users exist yet and ADMIN_USERNAME/ADMIN_PASSWORD are unset; /login will reject everyone until a user is created");
        return Ok(());
    };

    let password_hash = meridian_api_server::auth::hash_password(&password)?;
    state
        .users
        .create(&User {
            username: username.clone(),
            password_hash,
            is_admin: true,
            created_at: chrono::Utc::now(),
        })
        .await?;
    info!(username, "seeded initial admin user");
    Ok(())
}
