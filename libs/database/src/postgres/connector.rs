use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use super::PostgresConfig;
use crate::common::retry_with_backoff;

pub async fn connect_with_options(options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(options).await?;
    info!(backend = ?db.get_database_backend(), "Connected to database");
    Ok(db)
}

/// Connect using the config's own retry policy (`connect_retries`, 10s max delay)
///
/// ```ignore
/// use core_config::FromEnv;
/// use database::postgres::{PostgresConfig, connect_from_config_with_retry};
///
/// let db = connect_from_config_with_retry(PostgresConfig::from_env()?).await?;
/// ```
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
) -> Result<DatabaseConnection, DbErr> {
    let policy = config.retry_policy();
    let options = config.into_connect_options();

    retry_with_backoff(|| connect_with_options(options.clone()), policy).await
}

/// Apply every pending migration of `M`
///
/// ```ignore
/// run_migrations::<migration::Migrator>(&db, "products_api").await?;
/// ```
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> Result<(), DbErr> {
    info!(app = app_name, "Running database migrations");
    M::up(db, None).await?;
    info!(app = app_name, "Migrations completed");
    Ok(())
}
