use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use super::PostgresConfig;
use crate::common::{DatabaseError, DatabaseResult};

/// Open a pool using `config`.
///
/// # Example
/// ```ignore
/// use core_config::FromEnv;
/// use database::postgres::{PostgresConfig, connect_from_config};
///
/// let db = connect_from_config(PostgresConfig::from_env()?).await?;
/// ```
pub async fn connect_from_config(config: PostgresConfig) -> DatabaseResult<DatabaseConnection> {
    let target = config.redacted_url();
    let options: ConnectOptions = config.into_connect_options();

    let db = Database::connect(options).await.map_err(|e| {
        DatabaseError::ConnectionFailed(format!("PostgreSQL at {}: {}", target, e))
    })?;
    info!(database = %target, "Successfully connected to PostgreSQL database");

    Ok(db)
}

/// Close the pool, logging rather than propagating a failure.
pub async fn close(db: DatabaseConnection) {
    match db.close().await {
        Ok(()) => info!("PostgreSQL connection pool closed"),
        Err(e) => tracing::warn!(error = %e, "Failed to close PostgreSQL connection pool"),
    }
}
