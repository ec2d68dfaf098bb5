pub mod activity_log;
pub mod board_column;
pub mod comment;
pub mod project;
pub mod task;
pub mod workspace;
