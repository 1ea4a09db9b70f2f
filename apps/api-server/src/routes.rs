// [apps/api-server/src/routes.rs]
//! Route composition. Everything except `/healthz` and `/login` sits
//! behind `auth_guard`; role checks happen per-handler against the
//! caller's `Member::role` once the project id is known.

use axum::http::{header, Method};
use axum::routing::{get, post, put};
use axum::{middleware, Router};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers::{analysis, auth, devices, documents, folders, members, options, projects, topology, users};
use crate::middleware::auth_guard;
use crate::state::AppState;

async fn healthz() -> &'static str {
    "ok"
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let projects_routes = Router::new()
        .route("/", get(projects::list_projects).post(projects::create_project))
        .route("/:pid", get(projects::get_project).patch(projects::update_project).delete(projects::delete_project))
        .route("/:pid/members", get(members::list_members).post(members::add_member))
        .route("/:pid/members/:username", axum::routing::patch(members::update_member_role).delete(members::remove_member))
        .route("/:pid/folders", get(folders::list_folders).post(folders::create_folder))
        .route("/:pid/folders/:fid", axum::routing::patch(folders::rename_folder).delete(folders::delete_folder))
        .route("/:pid/documents", get(documents::list_documents).post(documents::upload_document))
        .route(
            "/:pid/documents/:did",
            get(documents::get_document).patch(documents::update_document).delete(documents::delete_document),
        )
        .route("/:pid/documents/:did/preview", get(documents::preview_document))
        .route("/:pid/documents/:did/download", get(documents::download_document))
        .route("/:pid/documents/:did/versions", get(documents::list_versions))
        .route("/:pid/documents/:did/move", post(documents::move_document))
        .route("/:pid/documents/:did/rename", post(documents::rename_document))
        .route("/:pid/documents/:did/content", get(documents::document_content))
        .route("/:pid/config-summary", get(devices::config_summary))
        .route("/:pid/summary-metrics", get(devices::summary_metrics))
        .route("/:pid/devices/:name", get(devices::get_device).delete(devices::delete_device))
        .route("/:pid/devices/:name/image", get(devices::get_device_image).put(devices::put_device_image))
        .route("/:pid/devices/:name/configs", get(devices::device_configs))
        .route("/:pid/analyze/overview", post(analysis::submit_overview))
        .route("/:pid/analyze/recommendations", post(analysis::submit_recommendations))
        .route("/:pid/analyze/topology", post(analysis::submit_topology))
        .route("/:pid/overview", get(analysis::get_overview))
        .route("/:pid/recommendations", get(analysis::get_recommendations))
        .route("/:pid/topology-analysis", get(analysis::get_topology))
        .route("/:pid/analyze/:kind/verify", post(analysis::verify_project))
        .route("/:pid/devices/:name/analyze/overview", post(analysis::submit_device_overview))
        .route("/:pid/devices/:name/analyze/recommendations", post(analysis::submit_device_recommendations))
        .route("/:pid/devices/:name/analyze/config-drift", post(analysis::submit_device_config_drift))
        .route("/:pid/devices/:name/overview", get(analysis::get_device_overview))
        .route("/:pid/devices/:name/recommendations", get(analysis::get_device_recommendations))
        .route("/:pid/devices/:name/config-drift", get(analysis::get_device_config_drift))
        .route("/:pid/devices/:name/analyze/:kind/verify", post(analysis::verify_device))
        .route("/:pid/analysis/full", get(analysis::analysis_full))
        .route("/:pid/topology", get(topology::get_topology))
        .route("/:pid/network-topology", get(topology::get_network_topology))
        .route("/:pid/topology/layout", put(topology::put_layout))
        .route("/:pid/options", get(options::list_options).post(options::add_option));

    let users_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/:username", axum::routing::delete(users::delete_user));

    let protected = Router::new()
        .nest("/projects", projects_routes)
        .nest("/users", users_routes)
        .route("/change-password", post(auth::change_password))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/login", post(auth::login))
        .merge(protected)
        .layer(cors)
        .with_state(state)
}
