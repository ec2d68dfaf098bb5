use std::{collections::HashMap, ops::Deref};

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    entities::{board_column, task},
    models::{
        board_column::BoardColumn,
        ids,
        project::{Project, ProjectError},
        task::Task,
    },
};

#[derive(Debug, Clone, Serialize, TS)]
pub struct ColumnWithTasks {
    #[serde(flatten)]
    pub column: BoardColumn,
    pub tasks: Vec<Task>,
}

impl Deref for ColumnWithTasks {
    type Target = BoardColumn;

    fn deref(&self) -> &Self::Target {
        &self.column
    }
}

#[derive(Debug, Clone, Serialize, TS)]
pub struct ProjectWithColumns {
    #[serde(flatten)]
    pub project: Project,
    pub columns: Vec<ColumnWithTasks>,
}

impl Deref for ProjectWithColumns {
    type Target = Project;

    fn deref(&self) -> &Self::Target {
        &self.project
    }
}

impl Project {
    /// Assemble the full board in one read: columns in rank order, each
    /// carrying its tasks sorted by priority (urgent first) and then age.
    pub async fn find_board_by_id<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
    ) -> Result<Option<ProjectWithColumns>, ProjectError> {
        let Some(project) = Project::find_by_id(db, project_id).await? else {
            return Ok(None);
        };
        let project_row_id = ids::project_id_by_uuid(db, project_id)
            .await?
            .ok_or(ProjectError::ProjectNotFound)?;

        let column_records = board_column::Entity::find()
            .filter(board_column::Column::ProjectId.eq(project_row_id))
            .order_by_asc(board_column::Column::Rank)
            .order_by_asc(board_column::Column::Id)
            .all(db)
            .await?;

        let task_records = task::Entity::find()
            .filter(task::Column::ProjectId.eq(project_row_id))
            .all(db)
            .await?;

        let column_uuid_by_row: HashMap<i64, Uuid> =
            column_records.iter().map(|c| (c.id, c.uuid)).collect();

        let mut tasks_by_column: HashMap<i64, Vec<Task>> = HashMap::new();
        for record in task_records {
            // Tasks without a lane are not part of the board view.
            let Some(column_row_id) = record.column_id else {
                continue;
            };
            let column_id = column_uuid_by_row.get(&column_row_id).copied();
            tasks_by_column
                .entry(column_row_id)
                .or_default()
                .push(Task::from_model(record, project_id, column_id));
        }

        let mut columns = Vec::with_capacity(column_records.len());
        for record in column_records {
            let mut tasks = tasks_by_column.remove(&record.id).unwrap_or_default();
            tasks.sort_by(|a, b| {
                b.priority
                    .rank()
                    .cmp(&a.priority.rank())
                    .then(a.created_at.cmp(&b.created_at))
                    .then(a.id.cmp(&b.id))
            });
            columns.push(ColumnWithTasks {
                column: BoardColumn::from_model(record, project_id),
                tasks,
            });
        }

        Ok(Some(ProjectWithColumns { project, columns }))
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::{
        models::{
            project::CreateProject,
            task::CreateTask,
            workspace::{CreateWorkspace, Workspace},
        },
        types::TaskPriority,
    };

    async fn setup_board() -> (sea_orm::DatabaseConnection, Uuid) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();

        let workspace_id = Uuid::new_v4();
        Workspace::create(
            &db,
            &CreateWorkspace {
                name: "Acme".to_string(),
                slug: "acme".to_string(),
            },
            workspace_id,
            "user-1",
        )
        .await
        .unwrap();

        let project_id = Uuid::new_v4();
        Project::create(
            &db,
            &CreateProject {
                name: "Redesign".to_string(),
                key: "RD".to_string(),
                description: None,
            },
            workspace_id,
            project_id,
            "user-1",
        )
        .await
        .unwrap();

        (db, project_id)
    }

    async fn add_task(
        db: &sea_orm::DatabaseConnection,
        project_id: Uuid,
        column_id: Uuid,
        title: &str,
        priority: TaskPriority,
    ) -> Task {
        Task::create(
            db,
            &CreateTask {
                title: title.to_string(),
                description: None,
                priority: Some(priority),
                column_id: Some(column_id),
                assignee_id: None,
                due_date: None,
                story_points: None,
            },
            project_id,
            Uuid::new_v4(),
            "user-1",
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn board_orders_tasks_by_priority_then_age() {
        let (db, project_id) = setup_board().await;
        let board = Project::find_board_by_id(&db, project_id)
            .await
            .unwrap()
            .unwrap();
        let todo = board.columns[0].id;

        add_task(&db, project_id, todo, "low", TaskPriority::Low).await;
        add_task(&db, project_id, todo, "urgent", TaskPriority::Urgent).await;
        add_task(&db, project_id, todo, "high-old", TaskPriority::High).await;
        add_task(&db, project_id, todo, "high-new", TaskPriority::High).await;

        let board = Project::find_board_by_id(&db, project_id)
            .await
            .unwrap()
            .unwrap();
        let titles: Vec<&str> = board.columns[0]
            .tasks
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["urgent", "high-old", "high-new", "low"]);
    }

    #[tokio::test]
    async fn board_holds_every_assigned_task_exactly_once() {
        let (db, project_id) = setup_board().await;
        let board = Project::find_board_by_id(&db, project_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(board.columns.len(), 3);

        let mut created = Vec::new();
        for column in &board.columns {
            created.push(
                add_task(&db, project_id, column.id, "task", TaskPriority::Medium)
                    .await
                    .id,
            );
        }

        let board = Project::find_board_by_id(&db, project_id)
            .await
            .unwrap()
            .unwrap();
        let mut seen: Vec<Uuid> = board
            .columns
            .iter()
            .flat_map(|c| c.tasks.iter().map(|t| t.id))
            .collect();
        seen.sort();
        created.sort();
        assert_eq!(seen, created);
    }

    #[tokio::test]
    async fn board_for_unknown_project_is_none() {
        let (db, _project_id) = setup_board().await;
        assert!(
            Project::find_board_by_id(&db, Uuid::new_v4())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn flattened_board_serialization_keeps_column_fields() {
        let (db, project_id) = setup_board().await;
        let board = Project::find_board_by_id(&db, project_id)
            .await
            .unwrap()
            .unwrap();

        let value = serde_json::to_value(&board).unwrap();
        assert_eq!(value["key"], "RD");
        let first = &value["columns"][0];
        assert_eq!(first["name"], "Todo");
        assert!(first["tasks"].is_array());
    }
}
