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
    activity::{ACTION_CREATE, ACTION_UPDATE, ColumnsReorderedMetadata, ENTITY_COLUMN,
               ENTITY_PROJECT},
    entities::board_column,
    models::{activity_log::ActivityLog, ids},
};

#[derive(Debug, Error)]
pub enum ColumnError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Column not found")]
    ColumnNotFound,
    #[error("Project not found")]
    ProjectNotFound,
    #[error("{0}")]
    ValidationError(String),
}

/// One lane on a project board. `rank` is the board position; it is not
/// unique, ties fall back to insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct BoardColumn {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub rank: i32,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct CreateBoardColumn {
    pub name: String,
    pub rank: i32,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct ReorderColumns {
    pub column_ids: Vec<Uuid>,
}

impl BoardColumn {
    pub(crate) fn from_model(model: board_column::Model, project_id: Uuid) -> Self {
        Self {
            id: model.uuid,
            project_id,
            name: model.name,
            rank: model.rank,
            created_at: model.created_at,
        }
    }

    pub async fn find_by_project_id<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
    ) -> Result<Vec<Self>, ColumnError> {
        let project_row_id = ids::project_id_by_uuid(db, project_id)
            .await?
            .ok_or(ColumnError::ProjectNotFound)?;
        let records = board_column::Entity::find()
            .filter(board_column::Column::ProjectId.eq(project_row_id))
            .order_by_asc(board_column::Column::Rank)
            .order_by_asc(board_column::Column::Id)
            .all(db)
            .await?;
        Ok(records
            .into_iter()
            .map(|m| Self::from_model(m, project_id))
            .collect())
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<Self>, ColumnError> {
        let record = board_column::Entity::find()
            .filter(board_column::Column::Uuid.eq(id))
            .one(db)
            .await?;
        let Some(record) = record else {
            return Ok(None);
        };
        let project_id = ids::project_uuid_by_id(db, record.project_id)
            .await?
            .ok_or(ColumnError::ProjectNotFound)?;
        Ok(Some(Self::from_model(record, project_id)))
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateBoardColumn,
        project_id: Uuid,
        id: Uuid,
        user_id: &str,
    ) -> Result<Self, ColumnError> {
        if data.name.trim().is_empty() {
            return Err(ColumnError::ValidationError(
                "name must not be empty".to_string(),
            ));
        }
        let project_row_id = ids::project_id_by_uuid(db, project_id)
            .await?
            .ok_or(ColumnError::ProjectNotFound)?;

        let record = board_column::ActiveModel {
            uuid: Set(id),
            project_id: Set(project_row_id),
            name: Set(data.name.trim().to_string()),
            rank: Set(data.rank),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        ActivityLog::record(db, ENTITY_COLUMN, id, ACTION_CREATE, user_id, None).await?;

        Ok(Self::from_model(record, project_id))
    }

    /// Rewrite every listed column's rank to its index in `column_ids`.
    /// Callers run this inside a transaction so a bad id voids the whole
    /// reorder instead of leaving the board half-shuffled.
    pub async fn update_order<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
        column_ids: &[Uuid],
        user_id: &str,
    ) -> Result<Vec<Self>, ColumnError> {
        let project_row_id = ids::project_id_by_uuid(db, project_id)
            .await?
            .ok_or(ColumnError::ProjectNotFound)?;

        for (index, column_id) in column_ids.iter().enumerate() {
            let record = board_column::Entity::find()
                .filter(board_column::Column::Uuid.eq(*column_id))
                .one(db)
                .await?
                .ok_or(ColumnError::ColumnNotFound)?;
            if record.project_id != project_row_id {
                return Err(ColumnError::ValidationError(format!(
                    "column {column_id} belongs to a different project"
                )));
            }
            let mut active: board_column::ActiveModel = record.into();
            active.rank = Set(index as i32);
            active.update(db).await?;
        }

        ActivityLog::record(
            db,
            ENTITY_PROJECT,
            project_id,
            ACTION_UPDATE,
            user_id,
            Some(serde_json::to_value(ColumnsReorderedMetadata {
                column_ids: column_ids.to_vec(),
            })
            .map_err(|e| DbErr::Custom(e.to_string()))?),
        )
        .await?;

        Self::find_by_project_id(db, project_id).await
    }
}
