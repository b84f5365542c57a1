use std::path::PathBuf;

use chrono::Utc;
use sea_orm::ConnectionTrait;
use tracing::{error, info};

use crate::{
    errors::ExecutionError,
    types::{SchemaUpdate, UpdateOutcome},
};

/// Applies single updates read from the update directory.
pub struct UpdateRunner {
    source_dir: PathBuf,
}

impl UpdateRunner {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
        }
    }

    /// Runs the update's SQL on `conn`, which may be a transaction.
    ///
    /// Never fails: errors are logged and reported as a `failed` outcome so the
    /// caller decides what happens to the rest of the batch.
    pub async fn apply<C>(&self, conn: &C, update: &SchemaUpdate) -> UpdateOutcome
    where
        C: ConnectionTrait,
    {
        info!("Applying update {} ({})", update.name, update.filename);

        let path = self.source_dir.join(&update.filename);
        let sql = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ExecutionError::ReadSql { path, source });

        let started = UpdateOutcome::started(update, Utc::now());
        let res = match sql {
            Ok(sql) => conn
                .execute_unprepared(&sql)
                .await
                .map(|_| ())
                .map_err(|source| ExecutionError::Sql {
                    filename: update.filename.clone(),
                    source,
                }),
            Err(e) => Err(e),
        };

        match res {
            Ok(()) => {
                info!("Successfully applied update {}", update.name);
                started.succeeded(Utc::now())
            }
            Err(e) => {
                error!("Error while applying update {}: {}", update.name, e);
                started.failed(Utc::now())
            }
        }
    }
}
