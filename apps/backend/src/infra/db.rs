use migration::migrate_up;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::DbConfig;
use crate::error::AppError;

/// Open a pool for the user store without touching the schema.
pub async fn connect_db(config: &DbConfig) -> Result<DatabaseConnection, AppError> {
    let mut opts = ConnectOptions::new(config.url.clone());
    opts.max_connections(config.max_connections)
        .sqlx_logging(false);

    let conn = Database::connect(opts).await?;
    info!(
        backend = ?conn.get_database_backend(),
        max_connections = config.max_connections,
        "database connected"
    );
    Ok(conn)
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(config: &DbConfig) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(config).await?;
    migrate_up(&conn).await?;
    Ok(conn)
}
