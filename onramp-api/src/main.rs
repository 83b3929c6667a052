mod config;
mod error;
mod extract;
mod middleware;
mod openshift;
mod quota;
mod shutdown;
mod state;

use axum::{
    extract::{Path, State},
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use k8s_openapi::api::core::v1::{LimitRange, ResourceQuota};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use error::ApiError;
use extract::Json;
use onramp_common::quota::QuotaFile;
use onramp_common::{
    roles, ProjectRequest, QuotaRequest, Response, RoleResponse, RoleStatus, UserRequest,
};
use openshift::client::OpenShiftClient;
use openshift::types::{Project, User};
use openshift::{groups, projects, quotas, users};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let onramp_config = config::OnrampConfig::load();
    if let Err(e) = onramp_config.validate() {
        error!("Configuration validation failed: {}", e);
        return Err(anyhow::anyhow!("Invalid configuration: {}", e));
    }

    // The quota file is loaded once and immutable for the service lifetime
    let quota_file = QuotaFile::load(&onramp_config.quota.file)
        .map_err(|e| anyhow::anyhow!("Failed to load quota file: {}", e))?;
    info!(
        "loaded {} quota specs and {} limit specs from {}",
        quota_file.quotas.len(),
        quota_file.limits.len(),
        onramp_config.quota.file.display()
    );

    // Connect to the cluster
    let client = OpenShiftClient::connect(&onramp_config.openshift)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to cluster: {}", e))?;
    if let Err(e) = client.health_check().await {
        warn!("Cluster health check failed: {}", e);
    }

    let addr = format!("{}:{}", onramp_config.server.host, onramp_config.server.port);

    let state = Arc::new(AppState {
        config: Arc::new(onramp_config),
        quota_file: Arc::new(quota_file),
        openshift: client,
    });

    // Build protected routes using modular route builders
    let protected_routes = Router::new()
        .merge(user_routes())
        .merge(project_routes())
        .merge(role_routes())
        .with_state(state.clone())
        // Add authentication middleware to protected routes
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    // Build main app with the public health endpoint and protected routes
    let app = Router::new()
        .route("/healthz", get(healthz))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http());

    // Start server
    info!("onramp API listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    info!("Server stopped, exiting");

    Ok(())
}

// =============================================================================
// Route Builder Functions
// =============================================================================

/// Build user routes
fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:name", get(get_user))
        .route("/users/:name", delete(delete_user))
}

/// Build project routes, including per-project quotas
fn project_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/projects", post(create_project))
        .route("/projects/:name", get(get_project))
        .route("/projects/:name", delete(delete_project))
        .route(
            "/projects/:name/quotas",
            get(get_quotas).put(put_quotas).delete(delete_quotas),
        )
}

/// Build role routes
fn role_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/users/:user/projects/:project/roles/:role",
        get(get_role).put(put_role).delete(delete_role),
    )
}

// =============================================================================
// Response envelopes
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct UserResponse {
    error: bool,
    user: User,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProjectResponse {
    error: bool,
    project: Project,
}

#[derive(Debug, Serialize, Deserialize)]
struct QuotaResponse {
    error: bool,
    quotas: Vec<ResourceQuota>,
    limits: Vec<LimitRange>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Healthcheck endpoint; the only route that requires no authentication
async fn healthz() -> &'static str {
    "OK"
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = users::create_user_bundle(
        &state.openshift,
        &state.config.openshift.identity_provider,
        &request.name,
        request.full_name.as_deref(),
    )
    .await?;

    Ok(Json(UserResponse { error: false, user }))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = users::get_user(&state.openshift, &name).await?;
    Ok(Json(UserResponse { error: false, user }))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Response>, ApiError> {
    users::delete_user_bundle(
        &state.openshift,
        &state.config.openshift.identity_provider,
        &name,
    )
    .await?;

    Ok(Json(Response::ok(format!("deleted user {name}"))))
}

async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProjectRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    onramp_common::validate_project_name(&request.name)?;

    let project = projects::create_project_bundle(&state.openshift, &request).await?;
    Ok(Json(ProjectResponse {
        error: false,
        project,
    }))
}

async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project = projects::get_project(&state.openshift, &name).await?;
    Ok(Json(ProjectResponse {
        error: false,
        project,
    }))
}

async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Response>, ApiError> {
    projects::delete_project_bundle(&state.openshift, &name).await?;
    Ok(Json(Response::ok(format!("deleted project {name}"))))
}

async fn get_quotas(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<QuotaResponse>, ApiError> {
    projects::get_project(&state.openshift, &name).await?;

    let (quota_items, limit_items) = quotas::get_quotas(&state.openshift, &name).await?;
    Ok(Json(QuotaResponse {
        error: false,
        quotas: quota_items,
        limits: limit_items,
    }))
}

async fn put_quotas(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(request): Json<QuotaRequest>,
) -> Result<Json<QuotaResponse>, ApiError> {
    request.validate()?;
    projects::get_project(&state.openshift, &name).await?;

    let (quota_items, limit_items) = quotas::apply_quotas(
        &state.openshift,
        &state.quota_file,
        &name,
        request.multiplier,
    )
    .await?;

    Ok(Json(QuotaResponse {
        error: false,
        quotas: quota_items,
        limits: limit_items,
    }))
}

async fn delete_quotas(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Response>, ApiError> {
    projects::get_project(&state.openshift, &name).await?;
    quotas::delete_quotas(&state.openshift, &name).await?;
    Ok(Json(Response::ok(format!(
        "deleted quotas for project {name}"
    ))))
}

/// Verify that both ends of a role assignment exist before touching groups
async fn check_role_target(
    state: &AppState,
    user: &str,
    project: &str,
    role: &str,
) -> Result<(), ApiError> {
    roles::check_role_name(role)?;
    users::get_user(&state.openshift, user).await?;
    projects::get_project(&state.openshift, project).await?;
    Ok(())
}

async fn get_role(
    State(state): State<Arc<AppState>>,
    Path((user, project, role)): Path<(String, String, String)>,
) -> Result<Json<RoleResponse>, ApiError> {
    check_role_target(&state, &user, &project, &role).await?;

    let has_role = groups::user_has_role(&state.openshift, &user, &project, &role).await?;
    Ok(Json(RoleResponse {
        error: false,
        role: RoleStatus {
            user,
            project,
            role,
            has_role,
        },
    }))
}

async fn put_role(
    State(state): State<Arc<AppState>>,
    Path((user, project, role)): Path<(String, String, String)>,
) -> Result<Json<RoleResponse>, ApiError> {
    check_role_target(&state, &user, &project, &role).await?;

    groups::add_user_to_role(&state.openshift, &user, &project, &role).await?;
    Ok(Json(RoleResponse {
        error: false,
        role: RoleStatus {
            user,
            project,
            role,
            has_role: true,
        },
    }))
}

async fn delete_role(
    State(state): State<Arc<AppState>>,
    Path((user, project, role)): Path<(String, String, String)>,
) -> Result<Json<RoleResponse>, ApiError> {
    check_role_target(&state, &user, &project, &role).await?;

    groups::remove_user_from_role(&state.openshift, &user, &project, &role).await?;
    Ok(Json(RoleResponse {
        error: false,
        role: RoleStatus {
            user,
            project,
            role,
            has_role: false,
        },
    }))
}
