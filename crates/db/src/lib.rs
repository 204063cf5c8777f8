//! Persistence layer: `SeaORM` entities, repositories, and schema migrations.

pub mod entities;
pub mod migrations;
pub mod repositories;
pub mod test_utils;

use std::time::Duration;

use chirp_common::{AppError, AppResult, Config};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::log::LevelFilter;

/// Open a `PostgreSQL` connection pool sized from the `[database]`
/// section of [`Config`].
///
/// SQL statement logging is forwarded to `tracing` at debug level.
pub async fn init(config: &Config) -> AppResult<DatabaseConnection> {
    let mut options = ConnectOptions::new(&config.database.url);
    options
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(3600))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(options)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Apply any migrations not yet recorded in the `seaql_migrations` table.
pub async fn migrate(db: &DatabaseConnection) -> AppResult<()> {
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}
