use std::path::PathBuf;

use sea_orm::DbErr;
use thiserror::Error;

use crate::types::{RunState, UpdateResult};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Malformed update filename '{filename}', expected '<digits>-<name>.sql'")]
    MalformedFilename { filename: String },

    #[error("Files not in sequence: {at}, {next}")]
    SequenceGap { at: String, next: String },

    #[error("Invalid update range: start {start} is greater than end {end}")]
    InvalidRange { start: i64, end: i64 },

    #[error("Failed to read update directory '{}'", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a single update. Contained by the runner and turned into a
/// `failed` outcome, never propagated past it.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Failed to read SQL file '{}'", path.display())]
    ReadSql {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SQL error in '{filename}': {source}")]
    Sql {
        filename: String,
        #[source]
        source: DbErr,
    },
}

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Database connection error: {0}")]
    Connection(#[source] DbErr),

    #[error("Failed to read schema update history: {0}")]
    HistoryLookup(#[source] DbErr),

    #[error("Failed to create schema update history table: {0}")]
    HistoryTable(#[source] DbErr),

    #[error(
        "Migrations were {state} but {count} outcome(s) could not be recorded, \
         the schema and the update history are now out of sync: {source}"
    )]
    HistoryPersistence {
        count: usize,
        state: RunState,
        #[source]
        source: DbErr,
    },

    #[error("Refusing to mark update '{filename}' as abandoned: its result is {result}, not succeeded")]
    AbandonInvariant {
        filename: String,
        result: UpdateResult,
    },
}

impl MigrationError {
    /// Persistence failures happen after the database was already changed.
    pub fn is_history_persistence(&self) -> bool {
        matches!(self, Self::HistoryPersistence { .. })
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Missing required option '{option}' (pass --{option} or set {env})")]
    MissingOption {
        option: &'static str,
        env: &'static str,
    },
}
