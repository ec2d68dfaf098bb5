use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::Serialize;
use serde_json::Value;
use ts_rs::TS;
use uuid::Uuid;

use crate::entities::activity_log;

/// Append-only audit trail. Rows are written inside the same transaction
/// as the mutation they describe, so a rolled-back write leaves no log.
#[derive(Debug, Clone, Serialize, TS)]
pub struct ActivityLog {
    pub id: Uuid,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub action: String,
    pub user_id: String,
    #[ts(type = "Record<string, unknown> | null")]
    pub metadata: Option<Value>,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
}

impl ActivityLog {
    fn from_model(model: activity_log::Model) -> Self {
        Self {
            id: model.uuid,
            entity_type: model.entity_type,
            entity_id: model.entity_uuid,
            action: model.action,
            user_id: model.user_id,
            metadata: model.metadata,
            created_at: model.created_at,
        }
    }

    pub async fn record<C: ConnectionTrait>(
        db: &C,
        entity_type: &str,
        entity_id: Uuid,
        action: &str,
        user_id: &str,
        metadata: Option<Value>,
    ) -> Result<(), DbErr> {
        activity_log::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            entity_type: Set(entity_type.to_string()),
            entity_uuid: Set(entity_id),
            action: Set(action.to_string()),
            user_id: Set(user_id.to_string()),
            metadata: Set(metadata),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        Ok(())
    }

    pub async fn find_by_entity<C: ConnectionTrait>(
        db: &C,
        entity_type: &str,
        entity_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let records = activity_log::Entity::find()
            .filter(activity_log::Column::EntityType.eq(entity_type))
            .filter(activity_log::Column::EntityUuid.eq(entity_id))
            .order_by_asc(activity_log::Column::Id)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;
    use serde_json::json;

    use super::*;
    use crate::activity::{ACTION_CREATE, ACTION_MOVE, ENTITY_TASK};

    #[tokio::test]
    async fn records_are_returned_in_insertion_order() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();

        let task_id = Uuid::new_v4();
        ActivityLog::record(&db, ENTITY_TASK, task_id, ACTION_CREATE, "user-1", None)
            .await
            .unwrap();
        ActivityLog::record(
            &db,
            ENTITY_TASK,
            task_id,
            ACTION_MOVE,
            "user-2",
            Some(json!({"to_column_id": Uuid::new_v4()})),
        )
        .await
        .unwrap();
        ActivityLog::record(&db, ENTITY_TASK, Uuid::new_v4(), ACTION_CREATE, "user-1", None)
            .await
            .unwrap();

        let logs = ActivityLog::find_by_entity(&db, ENTITY_TASK, task_id)
            .await
            .unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].action, ACTION_CREATE);
        assert_eq!(logs[0].user_id, "user-1");
        assert_eq!(logs[1].action, ACTION_MOVE);
        assert!(logs[1].metadata.is_some());
    }
}
