use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    activity::{
        ACTION_CREATE, ACTION_DELETE, ACTION_MOVE, ACTION_UPDATE, ENTITY_TASK, TaskMovedMetadata,
    },
    entities::task,
    models::{activity_log::ActivityLog, ids},
    types::TaskPriority,
};

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Task not found")]
    TaskNotFound,
    #[error("Project not found")]
    ProjectNotFound,
    #[error("Column not found")]
    ColumnNotFound,
    #[error("{0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub column_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub assignee_id: Option<String>,
    pub reporter_id: String,
    #[ts(type = "Date | null")]
    pub due_date: Option<DateTime<Utc>>,
    pub story_points: Option<i32>,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "Date")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub column_id: Option<Uuid>,
    pub assignee_id: Option<String>,
    #[ts(type = "Date | null")]
    pub due_date: Option<DateTime<Utc>>,
    pub story_points: Option<i32>,
}

/// Partial patch. Absent fields keep their current value; an empty string
/// for `description` clears it. Column changes go through `move_to_column`.
#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<String>,
    #[ts(type = "Date | null")]
    pub due_date: Option<DateTime<Utc>>,
    pub story_points: Option<i32>,
}

impl Task {
    pub(crate) fn from_model(
        model: task::Model,
        project_id: Uuid,
        column_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: model.uuid,
            project_id,
            column_id,
            title: model.title,
            description: model.description,
            priority: model.priority,
            assignee_id: model.assignee_id,
            reporter_id: model.reporter_id,
            due_date: model.due_date,
            story_points: model.story_points,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    async fn hydrate<C: ConnectionTrait>(db: &C, model: task::Model) -> Result<Self, TaskError> {
        let project_id = ids::project_uuid_by_id(db, model.project_id)
            .await?
            .ok_or(TaskError::ProjectNotFound)?;
        let column_id = match model.column_id {
            Some(row_id) => ids::column_uuid_by_id(db, row_id).await?,
            None => None,
        };
        Ok(Self::from_model(model, project_id, column_id))
    }

    async fn find_record<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<task::Model>, DbErr> {
        task::Entity::find()
            .filter(task::Column::Uuid.eq(id))
            .one(db)
            .await
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<Self>, TaskError> {
        match Self::find_record(db, id).await? {
            Some(record) => Ok(Some(Self::hydrate(db, record).await?)),
            None => Ok(None),
        }
    }

    /// Resolve the column and make sure it belongs to the given project.
    async fn resolve_column<C: ConnectionTrait>(
        db: &C,
        column_id: Uuid,
        project_row_id: i64,
    ) -> Result<i64, TaskError> {
        let column = crate::entities::board_column::Entity::find()
            .filter(crate::entities::board_column::Column::Uuid.eq(column_id))
            .one(db)
            .await?
            .ok_or(TaskError::ColumnNotFound)?;
        if column.project_id != project_row_id {
            return Err(TaskError::ValidationError(format!(
                "column {column_id} belongs to a different project"
            )));
        }
        Ok(column.id)
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateTask,
        project_id: Uuid,
        id: Uuid,
        reporter_id: &str,
    ) -> Result<Self, TaskError> {
        let title = data.title.trim();
        if title.is_empty() {
            return Err(TaskError::ValidationError(
                "title must not be empty".to_string(),
            ));
        }
        let project_row_id = ids::project_id_by_uuid(db, project_id)
            .await?
            .ok_or(TaskError::ProjectNotFound)?;
        let column_row_id = match data.column_id {
            Some(column_id) => Some(Self::resolve_column(db, column_id, project_row_id).await?),
            None => None,
        };

        let now = Utc::now();
        let record = task::ActiveModel {
            uuid: Set(id),
            project_id: Set(project_row_id),
            column_id: Set(column_row_id),
            title: Set(title.to_string()),
            description: Set(data.description.clone()),
            priority: Set(data.priority.unwrap_or_default()),
            assignee_id: Set(data.assignee_id.clone()),
            reporter_id: Set(reporter_id.to_string()),
            due_date: Set(data.due_date),
            story_points: Set(data.story_points),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        ActivityLog::record(db, ENTITY_TASK, id, ACTION_CREATE, reporter_id, None).await?;

        Ok(Self::from_model(record, project_id, data.column_id))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        data: &UpdateTask,
        user_id: &str,
    ) -> Result<Self, TaskError> {
        let record = Self::find_record(db, id)
            .await?
            .ok_or(TaskError::TaskNotFound)?;

        let mut active: task::ActiveModel = record.into();
        if let Some(title) = &data.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(TaskError::ValidationError(
                    "title must not be empty".to_string(),
                ));
            }
            active.title = Set(title.to_string());
        }
        if let Some(description) = &data.description {
            active.description = Set(if description.is_empty() {
                None
            } else {
                Some(description.clone())
            });
        }
        if let Some(priority) = data.priority {
            active.priority = Set(priority);
        }
        if let Some(assignee_id) = &data.assignee_id {
            active.assignee_id = Set(Some(assignee_id.clone()));
        }
        if let Some(due_date) = data.due_date {
            active.due_date = Set(Some(due_date));
        }
        if let Some(story_points) = data.story_points {
            active.story_points = Set(Some(story_points));
        }
        active.updated_at = Set(Utc::now());
        let record = active.update(db).await?;

        ActivityLog::record(db, ENTITY_TASK, id, ACTION_UPDATE, user_id, None).await?;

        Self::hydrate(db, record).await
    }

    /// Change only the task's lane. Everything else, including the rank of
    /// neighbouring tasks, stays untouched; board position within a lane is
    /// derived from priority and age at read time.
    pub async fn move_to_column<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        column_id: Uuid,
        user_id: &str,
    ) -> Result<Self, TaskError> {
        let record = Self::find_record(db, id)
            .await?
            .ok_or(TaskError::TaskNotFound)?;

        let from_column_id = match record.column_id {
            Some(row_id) => ids::column_uuid_by_id(db, row_id).await?,
            None => None,
        };
        let column_row_id = Self::resolve_column(db, column_id, record.project_id).await?;

        let mut active: task::ActiveModel = record.into();
        active.column_id = Set(Some(column_row_id));
        active.updated_at = Set(Utc::now());
        let record = active.update(db).await?;

        let metadata = serde_json::to_value(TaskMovedMetadata {
            from_column_id,
            to_column_id: column_id,
        })
        .map_err(|e| DbErr::Custom(e.to_string()))?;
        ActivityLog::record(db, ENTITY_TASK, id, ACTION_MOVE, user_id, Some(metadata)).await?;

        Self::hydrate(db, record).await
    }

    pub async fn delete<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        user_id: &str,
    ) -> Result<u64, TaskError> {
        let rows_affected = task::Entity::delete_many()
            .filter(task::Column::Uuid.eq(id))
            .exec(db)
            .await?
            .rows_affected;
        if rows_affected > 0 {
            ActivityLog::record(db, ENTITY_TASK, id, ACTION_DELETE, user_id, None).await?;
        }
        Ok(rows_affected)
    }
}
