use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr, EntityName, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Schema, Statement, TransactionTrait, Value,
};
use tracing::debug;

use crate::{
    entities::{HistoryActiveModel, HistoryColumn, HistoryEntity, HistoryModel},
    types::{SchemaUpdate, UpdateOutcome, UpdateResult},
};

/// Append-only store of update outcomes in the target database.
pub struct HistoryRepository {
    db: DatabaseConnection,
}

impl HistoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Creates the history table unless it already exists.
    pub async fn ensure_table(&self) -> Result<(), DbErr> {
        let backend = self.db.get_database_backend();
        let mut stmt = Schema::new(backend).create_table_from_entity(HistoryEntity);
        stmt.if_not_exists();

        let sql = backend.build(&stmt).sql;
        debug!("Ensuring history table: {}", sql);
        self.db.execute_unprepared(&sql).await?;
        Ok(())
    }

    /// Looks the history table up in the catalog without creating it.
    pub async fn has_table(&self) -> Result<bool, DbErr> {
        let backend = self.db.get_database_backend();
        let sql = match backend {
            DbBackend::Sqlite => "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?",
            DbBackend::Postgres => {
                "SELECT 1 FROM information_schema.tables \
                 WHERE table_schema = current_schema() AND table_name = $1"
            }
            _ => {
                "SELECT 1 FROM information_schema.tables \
                 WHERE table_schema = DATABASE() AND table_name = ?"
            }
        };

        let stmt =
            Statement::from_sql_and_values(backend, sql, [Value::from(HistoryEntity.table_name())]);
        Ok(self.db.query_one_raw(stmt).await?.is_some())
    }

    /// The update of the most recently inserted `succeeded` row.
    pub async fn last_successful(&self) -> Result<Option<SchemaUpdate>, DbErr> {
        let row = HistoryEntity::find()
            .filter(HistoryColumn::Result.eq(UpdateResult::Succeeded))
            .order_by_desc(HistoryColumn::Id)
            .one(&self.db)
            .await?;
        Ok(row.map(|r| r.update()))
    }

    /// Appends one row per outcome, in order, all or nothing.
    pub async fn record_outcomes(&self, outcomes: &[UpdateOutcome]) -> Result<usize, DbErr> {
        if outcomes.is_empty() {
            return Ok(0);
        }

        let models: Vec<HistoryActiveModel> = outcomes.iter().map(Into::into).collect();

        let txn = self.db.begin().await?;
        HistoryEntity::insert_many(models).exec(&txn).await?;
        txn.commit().await?;

        debug!("Recorded {} outcome(s)", outcomes.len());
        Ok(outcomes.len())
    }

    /// Recorded rows, newest first.
    pub async fn list(&self, limit: Option<u64>) -> Result<Vec<HistoryModel>, DbErr> {
        HistoryEntity::find()
            .order_by_desc(HistoryColumn::Id)
            .limit(limit)
            .all(&self.db)
            .await
    }
}
