use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;

pub use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};

pub mod entities;
pub mod models;

/// Owns the sea-orm connection handle; cloned freely across request
/// handlers (the underlying pool is shared).
#[derive(Clone)]
pub struct DbService {
    pub conn: DatabaseConnection,
}

impl DbService {
    /// Connects to `database_url` and brings the schema up to date.
    pub async fn new(database_url: &str) -> Result<DbService, DbErr> {
        let mut options = ConnectOptions::new(database_url.to_owned());
        options.max_connections(5).sqlx_logging(false);
        let conn = Database::connect(options).await?;
        tracing::debug!("Running database migrations");
        db_migration::Migrator::up(&conn, None).await?;
        Ok(DbService { conn })
    }
}
