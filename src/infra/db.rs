use std::str::FromStr;

use sqlx::{
    SqlitePool,
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::info;

use super::InfraError;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn init_db(database_url: &str) -> Result<SqlitePool, InfraError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(InfraError::DatabaseConnection)?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(InfraError::DatabaseConnection)?;

    MIGRATOR.run(&pool).await.map_err(InfraError::Migration)?;

    info!("Connected to database!");
    Ok(pool)
}

/// Single-connection in-memory database with the schema applied.
///
/// Every SQLite `:memory:` connection is its own database, so the pool must
/// never open a second one or drop the first.
#[cfg(test)]
pub async fn memory_pool() -> Result<SqlitePool, InfraError> {
    let options =
        SqliteConnectOptions::from_str("sqlite::memory:").map_err(InfraError::DatabaseConnection)?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(InfraError::DatabaseConnection)?;
    MIGRATOR.run(&pool).await.map_err(InfraError::Migration)?;
    Ok(pool)
}
