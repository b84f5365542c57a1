pub mod migration_service;
pub mod update_runner;

use anyhow::Result;
use std::sync::Arc;

pub use migration_service::MigrationService;
pub use update_runner::UpdateRunner;

use crate::{config::Settings, db::init_db, repo::HistoryRepository};

pub struct AppServices {
    pub migration_service: MigrationService,
}

impl AppServices {
    pub async fn new(settings: &Settings) -> Result<Self> {
        let db = init_db(&settings.database).await?;
        Ok(Self::from_db(db))
    }

    pub fn from_db(db: sea_orm::DatabaseConnection) -> Self {
        let history_repo = Arc::new(HistoryRepository::new(db.clone()));
        Self {
            migration_service: MigrationService::new(db, history_repo),
        }
    }
}
