use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

use crate::{entities::comment, models::ids};

#[derive(Debug, Error)]
pub enum CommentError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Task not found")]
    TaskNotFound,
    #[error("{0}")]
    ValidationError(String),
}

/// Discussion entry on a task. There is no foreign key behind `task_id`:
/// deleting the task leaves its comments in the store, unreachable through
/// task queries.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Comment {
    pub id: Uuid,
    pub task_id: Uuid,
    pub content: String,
    pub user_id: String,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct CreateComment {
    pub content: String,
}

impl Comment {
    fn from_model(model: comment::Model, task_id: Uuid) -> Self {
        Self {
            id: model.uuid,
            task_id,
            content: model.content,
            user_id: model.user_id,
            created_at: model.created_at,
        }
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateComment,
        task_id: Uuid,
        id: Uuid,
        user_id: &str,
    ) -> Result<Self, CommentError> {
        if data.content.trim().is_empty() {
            return Err(CommentError::ValidationError(
                "content must not be empty".to_string(),
            ));
        }
        let task_row_id = ids::task_id_by_uuid(db, task_id)
            .await?
            .ok_or(CommentError::TaskNotFound)?;

        let record = comment::ActiveModel {
            uuid: Set(id),
            task_id: Set(task_row_id),
            content: Set(data.content.clone()),
            user_id: Set(user_id.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok(Self::from_model(record, task_id))
    }

    pub async fn find_by_task_id<C: ConnectionTrait>(
        db: &C,
        task_id: Uuid,
    ) -> Result<Vec<Self>, CommentError> {
        let task_row_id = ids::task_id_by_uuid(db, task_id)
            .await?
            .ok_or(CommentError::TaskNotFound)?;
        let records = comment::Entity::find()
            .filter(comment::Column::TaskId.eq(task_row_id))
            .order_by_asc(comment::Column::Id)
            .all(db)
            .await?;
        Ok(records
            .into_iter()
            .map(|m| Self::from_model(m, task_id))
            .collect())
    }
}
