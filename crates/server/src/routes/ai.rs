use axum::{Json, Router, extract::State, response::Json as ResponseJson, routing::post};
use deployment::Deployment;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

#[derive(Debug, Deserialize, TS)]
pub struct GenerateSubtasksRequest {
    pub task_description: String,
}

#[derive(Debug, Deserialize, TS)]
pub struct SummarizeTaskRequest {
    pub content: String,
}

#[derive(Debug, Serialize, TS)]
pub struct SummarizeTaskResponse {
    pub summary: String,
}

pub async fn generate_subtasks(
    State(deployment): State<DeploymentImpl>,
    Json(payload): Json<GenerateSubtasksRequest>,
) -> Result<ResponseJson<ApiResponse<Vec<String>>>, ApiError> {
    let subtasks = deployment
        .ai()
        .generate_subtasks(&payload.task_description)
        .await?;
    Ok(ResponseJson(ApiResponse::success(subtasks)))
}

pub async fn summarize_task(
    State(deployment): State<DeploymentImpl>,
    Json(payload): Json<SummarizeTaskRequest>,
) -> Result<ResponseJson<ApiResponse<SummarizeTaskResponse>>, ApiError> {
    let summary = deployment.ai().summarize_task(&payload.content).await?;
    Ok(ResponseJson(ApiResponse::success(SummarizeTaskResponse {
        summary,
    })))
}

pub fn router() -> Router<DeploymentImpl> {
    Router::new()
        .route("/ai/subtasks", post(generate_subtasks))
        .route("/ai/summarize", post(summarize_task))
}
