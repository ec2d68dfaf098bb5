pub mod activity_log;
pub mod board;
pub mod board_column;
pub mod comment;
pub mod ids;
pub mod project;
pub mod task;
pub mod workspace;
