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
    activity::{ACTION_CREATE, ENTITY_WORKSPACE},
    entities::workspace,
    models::activity_log::ActivityLog,
};

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Workspace not found")]
    WorkspaceNotFound,
    #[error("{0}")]
    ValidationError(String),
}

/// Top-level tenant boundary. Every project hangs off exactly one
/// workspace, and the owner is whatever identity the auth layer handed us.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Workspace {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub owner_id: String,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct CreateWorkspace {
    pub name: String,
    pub slug: String,
}

fn validate_slug(slug: &str) -> Result<(), WorkspaceError> {
    if slug.is_empty() {
        return Err(WorkspaceError::ValidationError(
            "slug must not be empty".to_string(),
        ));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(WorkspaceError::ValidationError(
            "slug may only contain lowercase letters, digits and hyphens".to_string(),
        ));
    }
    Ok(())
}

impl Workspace {
    fn from_model(model: workspace::Model) -> Self {
        Self {
            id: model.uuid,
            name: model.name,
            slug: model.slug,
            owner_id: model.owner_id,
            created_at: model.created_at,
        }
    }

    pub async fn find_by_owner<C: ConnectionTrait>(
        db: &C,
        owner_id: &str,
    ) -> Result<Vec<Self>, DbErr> {
        let records = workspace::Entity::find()
            .filter(workspace::Column::OwnerId.eq(owner_id))
            .order_by_desc(workspace::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = workspace::Entity::find()
            .filter(workspace::Column::Uuid.eq(id))
            .one(db)
            .await?;
        Ok(record.map(Self::from_model))
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateWorkspace,
        id: Uuid,
        owner_id: &str,
    ) -> Result<Self, WorkspaceError> {
        let name = data.name.trim();
        if name.is_empty() {
            return Err(WorkspaceError::ValidationError(
                "name must not be empty".to_string(),
            ));
        }
        validate_slug(&data.slug)?;

        if workspace::Entity::find()
            .filter(workspace::Column::Slug.eq(data.slug.as_str()))
            .one(db)
            .await?
            .is_some()
        {
            return Err(WorkspaceError::ValidationError(format!(
                "slug '{}' is already taken",
                data.slug
            )));
        }

        let record = workspace::ActiveModel {
            uuid: Set(id),
            name: Set(name.to_string()),
            slug: Set(data.slug.clone()),
            owner_id: Set(owner_id.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        ActivityLog::record(db, ENTITY_WORKSPACE, id, ACTION_CREATE, owner_id, None).await?;

        Ok(Self::from_model(record))
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn create_and_list_by_owner() {
        let db = setup_db().await;

        let created = Workspace::create(
            &db,
            &CreateWorkspace {
                name: "Acme".to_string(),
                slug: "acme".to_string(),
            },
            Uuid::new_v4(),
            "user-1",
        )
        .await
        .unwrap();

        Workspace::create(
            &db,
            &CreateWorkspace {
                name: "Other".to_string(),
                slug: "other".to_string(),
            },
            Uuid::new_v4(),
            "user-2",
        )
        .await
        .unwrap();

        let mine = Workspace::find_by_owner(&db, "user-1").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, created.id);
        assert_eq!(mine[0].owner_id, "user-1");

        let found = Workspace::find_by_id(&db, created.id).await.unwrap();
        assert_eq!(found.unwrap().slug, "acme");
    }

    #[tokio::test]
    async fn rejects_blank_name_and_bad_slug() {
        let db = setup_db().await;

        let err = Workspace::create(
            &db,
            &CreateWorkspace {
                name: "   ".to_string(),
                slug: "acme".to_string(),
            },
            Uuid::new_v4(),
            "user-1",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WorkspaceError::ValidationError(_)));

        let err = Workspace::create(
            &db,
            &CreateWorkspace {
                name: "Acme".to_string(),
                slug: "Not A Slug".to_string(),
            },
            Uuid::new_v4(),
            "user-1",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WorkspaceError::ValidationError(_)));
    }

    #[tokio::test]
    async fn rejects_duplicate_slug() {
        let db = setup_db().await;

        let data = CreateWorkspace {
            name: "Acme".to_string(),
            slug: "acme".to_string(),
        };
        Workspace::create(&db, &data, Uuid::new_v4(), "user-1")
            .await
            .unwrap();
        let err = Workspace::create(&db, &data, Uuid::new_v4(), "user-2")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::ValidationError(_)));
    }
}
