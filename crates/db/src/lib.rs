use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use utils::assets::asset_dir;

pub mod activity;
pub mod entities;
pub mod models;
pub mod types;

pub use sea_orm::{ConnectionTrait, DbErr, TransactionTrait};

#[derive(Clone)]
pub struct DBService {
    pub conn: DatabaseConnection,
}

fn database_url() -> String {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        let url = url.trim();
        if !url.is_empty() {
            return url.to_string();
        }
    }
    format!(
        "sqlite://{}?mode=rwc",
        asset_dir().join("db.sqlite").to_string_lossy()
    )
}

impl DBService {
    pub async fn new() -> Result<DBService, DbErr> {
        let mut options = ConnectOptions::new(database_url());
        options.sqlx_logging(false);
        let conn = Database::connect(options).await?;
        db_migration::Migrator::up(&conn, None).await?;
        Ok(DBService { conn })
    }
}
