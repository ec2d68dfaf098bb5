use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    activity::{ACTION_CREATE, ENTITY_PROJECT},
    entities::project,
    models::{
        activity_log::ActivityLog,
        board_column::{BoardColumn, CreateBoardColumn},
        ids,
    },
};

/// Every project starts with these lanes, in this order.
pub const DEFAULT_COLUMNS: [&str; 3] = ["Todo", "In Progress", "Done"];

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Project not found")]
    ProjectNotFound,
    #[error("Workspace not found")]
    WorkspaceNotFound,
    #[error("{0}")]
    ValidationError(String),
}

impl From<crate::models::board_column::ColumnError> for ProjectError {
    fn from(err: crate::models::board_column::ColumnError) -> Self {
        use crate::models::board_column::ColumnError;
        match err {
            ColumnError::Database(e) => ProjectError::Database(e),
            ColumnError::ProjectNotFound => ProjectError::ProjectNotFound,
            ColumnError::ColumnNotFound => {
                ProjectError::ValidationError("column not found".to_string())
            }
            ColumnError::ValidationError(msg) => ProjectError::ValidationError(msg),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Project {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub key: String,
    pub description: Option<String>,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct CreateProject {
    pub name: String,
    pub key: String,
    pub description: Option<String>,
}

impl Project {
    pub(crate) fn from_model(model: project::Model, workspace_id: Uuid) -> Self {
        Self {
            id: model.uuid,
            workspace_id,
            name: model.name,
            key: model.key,
            description: model.description,
            created_at: model.created_at,
        }
    }

    pub async fn find_by_workspace_id<C: ConnectionTrait>(
        db: &C,
        workspace_id: Uuid,
    ) -> Result<Vec<Self>, ProjectError> {
        let workspace_row_id = ids::workspace_id_by_uuid(db, workspace_id)
            .await?
            .ok_or(ProjectError::WorkspaceNotFound)?;
        let records = project::Entity::find()
            .filter(project::Column::WorkspaceId.eq(workspace_row_id))
            .order_by_desc(project::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(records
            .into_iter()
            .map(|m| Self::from_model(m, workspace_id))
            .collect())
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<Self>, ProjectError> {
        let record = project::Entity::find()
            .filter(project::Column::Uuid.eq(id))
            .one(db)
            .await?;
        let Some(record) = record else {
            return Ok(None);
        };
        let workspace_id = ids::workspace_uuid_by_id(db, record.workspace_id)
            .await?
            .ok_or(ProjectError::WorkspaceNotFound)?;
        Ok(Some(Self::from_model(record, workspace_id)))
    }

    /// Insert the project row and seed the default board lanes. Run inside
    /// a transaction: a failed seed must take the project row with it.
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateProject,
        workspace_id: Uuid,
        id: Uuid,
        user_id: &str,
    ) -> Result<Self, ProjectError> {
        let name = data.name.trim();
        if name.is_empty() {
            return Err(ProjectError::ValidationError(
                "name must not be empty".to_string(),
            ));
        }
        let key = data.key.trim();
        if key.is_empty() {
            return Err(ProjectError::ValidationError(
                "key must not be empty".to_string(),
            ));
        }
        let workspace_row_id = ids::workspace_id_by_uuid(db, workspace_id)
            .await?
            .ok_or(ProjectError::WorkspaceNotFound)?;

        let record = project::ActiveModel {
            uuid: Set(id),
            workspace_id: Set(workspace_row_id),
            name: Set(name.to_string()),
            key: Set(key.to_string()),
            description: Set(data.description.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        for (rank, column_name) in DEFAULT_COLUMNS.iter().enumerate() {
            BoardColumn::create(
                db,
                &CreateBoardColumn {
                    name: column_name.to_string(),
                    rank: rank as i32,
                },
                id,
                Uuid::new_v4(),
                user_id,
            )
            .await?;
        }

        ActivityLog::record(db, ENTITY_PROJECT, id, ACTION_CREATE, user_id, None).await?;

        Ok(Self::from_model(record, workspace_id))
    }
}
