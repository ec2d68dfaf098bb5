use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ACTION_CREATE: &str = "create";
pub const ACTION_UPDATE: &str = "update";
pub const ACTION_DELETE: &str = "delete";
pub const ACTION_MOVE: &str = "move";

pub const ENTITY_TASK: &str = "task";
pub const ENTITY_PROJECT: &str = "project";
pub const ENTITY_WORKSPACE: &str = "workspace";
pub const ENTITY_COLUMN: &str = "column";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskMovedMetadata {
    pub from_column_id: Option<Uuid>,
    pub to_column_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnsReorderedMetadata {
    pub column_ids: Vec<Uuid>,
}
