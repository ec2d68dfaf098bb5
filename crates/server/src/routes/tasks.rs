use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::patch,
};
use db::{
    TransactionTrait,
    models::task::{Task, UpdateTask},
};
use deployment::Deployment;
use serde::Deserialize;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    DeploymentImpl, error::ApiError, http::auth::AuthUser, middleware::load_task_middleware,
};

#[derive(Debug, Deserialize, TS)]
pub struct MoveTask {
    pub column_id: Uuid,
}

pub async fn update_task(
    State(deployment): State<DeploymentImpl>,
    Extension(existing): Extension<Task>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let tx = deployment.db().conn.begin().await?;
    let task = Task::update(&tx, existing.id, &payload, &user.id).await?;
    tx.commit().await?;

    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn delete_task(
    State(deployment): State<DeploymentImpl>,
    Extension(existing): Extension<Task>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode, ApiError> {
    let tx = deployment.db().conn.begin().await?;
    Task::delete(&tx, existing.id, &user.id).await?;
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn move_task(
    State(deployment): State<DeploymentImpl>,
    Extension(existing): Extension<Task>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<MoveTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let tx = deployment.db().conn.begin().await?;
    let task = Task::move_to_column(&tx, existing.id, payload.column_id, &user.id).await?;
    tx.commit().await?;

    Ok(ResponseJson(ApiResponse::success(task)))
}

pub fn router(deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    let task_router = Router::new()
        .route("/", patch(update_task).delete(delete_task))
        .route("/move", patch(move_task))
        .layer(from_fn_with_state(
            deployment.clone(),
            load_task_middleware::<DeploymentImpl>,
        ));

    Router::new().nest("/tasks/{task_id}", task_router)
}
