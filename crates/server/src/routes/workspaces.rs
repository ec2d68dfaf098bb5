use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::get,
};
use db::{
    TransactionTrait,
    models::{
        project::{CreateProject, Project},
        workspace::{CreateWorkspace, Workspace},
    },
};
use deployment::Deployment;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    DeploymentImpl, error::ApiError, http::auth::AuthUser,
    middleware::load_workspace_middleware,
};

pub async fn get_workspaces(
    State(deployment): State<DeploymentImpl>,
    Extension(user): Extension<AuthUser>,
) -> Result<ResponseJson<ApiResponse<Vec<Workspace>>>, ApiError> {
    let workspaces = Workspace::find_by_owner(&deployment.db().conn, &user.id).await?;
    Ok(ResponseJson(ApiResponse::success(workspaces)))
}

pub async fn create_workspace(
    State(deployment): State<DeploymentImpl>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateWorkspace>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Workspace>>), ApiError> {
    let id = Uuid::new_v4();
    let tx = deployment.db().conn.begin().await?;
    let workspace = Workspace::create(&tx, &payload, id, &user.id).await?;
    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(workspace)),
    ))
}

pub async fn get_workspace(
    Extension(workspace): Extension<Workspace>,
) -> Result<ResponseJson<ApiResponse<Workspace>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(workspace)))
}

pub async fn get_workspace_projects(
    State(deployment): State<DeploymentImpl>,
    Extension(workspace): Extension<Workspace>,
) -> Result<ResponseJson<ApiResponse<Vec<Project>>>, ApiError> {
    let projects = Project::find_by_workspace_id(&deployment.db().conn, workspace.id).await?;
    Ok(ResponseJson(ApiResponse::success(projects)))
}

pub async fn create_project(
    State(deployment): State<DeploymentImpl>,
    Extension(workspace): Extension<Workspace>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateProject>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Project>>), ApiError> {
    let id = Uuid::new_v4();
    // Project insert and default-column seeding commit together.
    let tx = deployment.db().conn.begin().await?;
    let project = Project::create(&tx, &payload, workspace.id, id, &user.id).await?;
    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(project)),
    ))
}

pub fn router(deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    let workspace_router = Router::new()
        .route("/", get(get_workspace))
        .route(
            "/projects",
            get(get_workspace_projects).post(create_project),
        )
        .layer(from_fn_with_state(
            deployment.clone(),
            load_workspace_middleware::<DeploymentImpl>,
        ));

    Router::new()
        .route("/workspaces", get(get_workspaces).post(create_workspace))
        .nest("/workspaces/{workspace_id}", workspace_router)
}
