use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::{
    DbErr,
    models::{
        board_column::ColumnError, comment::CommentError, project::ProjectError, task::TaskError,
        workspace::WorkspaceError,
    },
};
use deployment::DeploymentError;
use services::services::{ai::AiServiceError, config::ConfigError};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error, ts_rs::TS)]
#[ts(type = "string")]
pub enum ApiError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Column(#[from] ColumnError),
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Comment(#[from] CommentError),
    #[error(transparent)]
    Ai(#[from] AiServiceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Deployment(#[from] DeploymentError),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<&'static str> for ApiError {
    fn from(msg: &'static str) -> Self {
        ApiError::BadRequest(msg.to_string())
    }
}

impl ApiError {
    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Workspace(err) => match err {
                WorkspaceError::WorkspaceNotFound => (StatusCode::NOT_FOUND, "WorkspaceError"),
                WorkspaceError::ValidationError(_) => (StatusCode::BAD_REQUEST, "WorkspaceError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "WorkspaceError"),
            },
            ApiError::Project(err) => match err {
                ProjectError::ProjectNotFound | ProjectError::WorkspaceNotFound => {
                    (StatusCode::NOT_FOUND, "ProjectError")
                }
                ProjectError::ValidationError(_) => (StatusCode::BAD_REQUEST, "ProjectError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "ProjectError"),
            },
            ApiError::Column(err) => match err {
                ColumnError::ColumnNotFound | ColumnError::ProjectNotFound => {
                    (StatusCode::NOT_FOUND, "ColumnError")
                }
                ColumnError::ValidationError(_) => (StatusCode::BAD_REQUEST, "ColumnError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "ColumnError"),
            },
            ApiError::Task(err) => match err {
                TaskError::TaskNotFound
                | TaskError::ProjectNotFound
                | TaskError::ColumnNotFound => (StatusCode::NOT_FOUND, "TaskError"),
                TaskError::ValidationError(_) => (StatusCode::BAD_REQUEST, "TaskError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "TaskError"),
            },
            ApiError::Comment(err) => match err {
                CommentError::TaskNotFound => (StatusCode::NOT_FOUND, "CommentError"),
                CommentError::ValidationError(_) => (StatusCode::BAD_REQUEST, "CommentError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "CommentError"),
            },
            ApiError::Ai(_) => (StatusCode::INTERNAL_SERVER_ERROR, "AiServiceError"),
            ApiError::Config(err) => match err {
                ConfigError::ValidationError(_) => (StatusCode::BAD_REQUEST, "ConfigError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "ConfigError"),
            },
            ApiError::Deployment(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DeploymentError"),
            ApiError::Database(db_err) => match db_err {
                DbErr::RecordNotFound(_) => (StatusCode::NOT_FOUND, "DatabaseError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
            },
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IoError"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = self.status_and_type();

        let error_message = match &self {
            // Upstream AI failures must not leak request details.
            ApiError::Ai(AiServiceError::MissingApiKey) => {
                "AI API key is not configured".to_string()
            }
            ApiError::Ai(_) => "AI request failed".to_string(),
            ApiError::Unauthorized => "Unauthorized".to_string(),
            ApiError::NotFound(msg) => msg.clone(),
            ApiError::Internal(msg) => msg.clone(),
            ApiError::BadRequest(msg) => msg.clone(),
            _ => format!("{}: {}", error_type, self),
        };

        if status_code.is_server_error() {
            tracing::error!(
                status = %status_code,
                error_type,
                error = %self,
                "API request failed"
            );
        }
        let response = ApiResponse::<()>::error(&error_message);
        (status_code, Json(response)).into_response()
    }
}
