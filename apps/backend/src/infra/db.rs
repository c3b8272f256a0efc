use sea_orm::{Database, DatabaseConnection};

use crate::config::db::{db_url, DbProfile};
use crate::error::AppError;

/// Connect to the database for the given profile.
/// This function does NOT run any migrations.
pub async fn connect_db(profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    let database_url = db_url(profile)?;
    let mut options = sea_orm::ConnectOptions::new(database_url);
    if profile == DbProfile::Test {
        // A pooled in-memory SQLite would give every connection its own
        // empty database; pin the pool to one connection.
        options.max_connections(1);
    }
    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Connect and bring the schema up to date. Single entrypoint used by both
/// the server bootstrap and the test state builder.
pub async fn bootstrap_db(profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(profile).await?;
    migration::migrate(&conn, migration::MigrationCommand::Up)
        .await
        .map_err(|e| AppError::db(format!("migration failed: {e}")))?;
    Ok(conn)
}
