use sea_orm::{Database, DatabaseConnection};
use tracing::info;

use crate::{config::DatabaseConfig, errors::MigrationError};

/// Connects to the database being migrated.
pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, MigrationError> {
    let url = config.connection_url()?;

    info!("Connecting to {}", config.describe());
    Database::connect(&url)
        .await
        .map_err(MigrationError::Connection)
}
