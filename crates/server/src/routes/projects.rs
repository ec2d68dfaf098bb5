use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, patch, post},
};
use db::{
    TransactionTrait,
    models::{
        board::ProjectWithColumns,
        board_column::{BoardColumn, CreateBoardColumn, ReorderColumns},
        project::{Project, ProjectError},
        task::{CreateTask, Task},
    },
};
use deployment::Deployment;
use services::services::analytics::VelocityPoint;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    DeploymentImpl, error::ApiError, http::auth::AuthUser, middleware::load_project_middleware,
};

pub async fn get_board(
    State(deployment): State<DeploymentImpl>,
    Extension(project): Extension<Project>,
) -> Result<ResponseJson<ApiResponse<ProjectWithColumns>>, ApiError> {
    let board = Project::find_board_by_id(&deployment.db().conn, project.id)
        .await?
        .ok_or(ProjectError::ProjectNotFound)?;
    Ok(ResponseJson(ApiResponse::success(board)))
}

pub async fn create_column(
    State(deployment): State<DeploymentImpl>,
    Extension(project): Extension<Project>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateBoardColumn>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<BoardColumn>>), ApiError> {
    let id = Uuid::new_v4();
    let tx = deployment.db().conn.begin().await?;
    let column = BoardColumn::create(&tx, &payload, project.id, id, &user.id).await?;
    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(column)),
    ))
}

pub async fn reorder_columns(
    State(deployment): State<DeploymentImpl>,
    Extension(project): Extension<Project>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ReorderColumns>,
) -> Result<ResponseJson<ApiResponse<Vec<BoardColumn>>>, ApiError> {
    // All rank writes commit together or not at all.
    let tx = deployment.db().conn.begin().await?;
    let columns =
        BoardColumn::update_order(&tx, project.id, &payload.column_ids, &user.id).await?;
    tx.commit().await?;

    Ok(ResponseJson(ApiResponse::success(columns)))
}

pub async fn get_velocity(
    State(deployment): State<DeploymentImpl>,
    Extension(project): Extension<Project>,
) -> Result<ResponseJson<ApiResponse<Vec<VelocityPoint>>>, ApiError> {
    let points = deployment.analytics().project_velocity(project.id);
    Ok(ResponseJson(ApiResponse::success(points)))
}

pub async fn create_task(
    State(deployment): State<DeploymentImpl>,
    Extension(project): Extension<Project>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateTask>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Task>>), ApiError> {
    let id = Uuid::new_v4();
    let tx = deployment.db().conn.begin().await?;
    let task = Task::create(&tx, &payload, project.id, id, &user.id).await?;
    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(task)),
    ))
}

pub fn router(deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    let project_router = Router::new()
        .route("/board", get(get_board))
        .route("/columns", post(create_column))
        .route("/columns/order", patch(reorder_columns))
        .route("/analytics/velocity", get(get_velocity))
        .route("/tasks", post(create_task))
        .layer(from_fn_with_state(
            deployment.clone(),
            load_project_middleware::<DeploymentImpl>,
        ));

    Router::new().nest("/projects/{project_id}", project_router)
}
