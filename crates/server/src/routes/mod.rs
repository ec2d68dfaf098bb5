pub mod ai;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod workspaces;
