use std::sync::Arc;

use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, error, info, warn};

use crate::{
    catalog::{load_catalog, restrict_range, validate_sequence},
    config::MigrationOptions,
    errors::MigrationError,
    repo::HistoryRepository,
    services::UpdateRunner,
    types::{
        HistoryMode, MigrationPlan, MigrationReport, RunState, SchemaUpdate, UpdateOutcome,
    },
    utils::fs::list_update_files,
};

/// Drives a whole run: catalog, resume point, application, history.
pub struct MigrationService {
    db: DatabaseConnection,
    history_repo: Arc<HistoryRepository>,
}

fn enter(state: &mut RunState, next: RunState) {
    debug!("Run state {} -> {}", state, next);
    *state = next;
}

/// Catalog entries strictly after the resume point, in catalog order.
pub fn filter_pending(
    catalog: &[SchemaUpdate],
    last_successful: Option<&SchemaUpdate>,
) -> Vec<SchemaUpdate> {
    catalog
        .iter()
        .filter(|u| last_successful.is_none_or(|last| u.index > last.index))
        .cloned()
        .collect()
}

/// Marks every outcome before the failing last one as abandoned.
///
/// The batch stops at its first failure, so everything before the last outcome
/// must have succeeded; anything else is reported instead of relabelled.
pub fn abandon_preceding(
    mut outcomes: Vec<UpdateOutcome>,
) -> Result<Vec<UpdateOutcome>, MigrationError> {
    let Some(failing) = outcomes.pop() else {
        return Ok(outcomes);
    };

    let mut abandoned = outcomes
        .into_iter()
        .map(|o| {
            if o.is_succeeded() {
                Ok(o.abandoned())
            } else {
                Err(MigrationError::AbandonInvariant {
                    filename: o.filename,
                    result: o.result,
                })
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    abandoned.push(failing);
    Ok(abandoned)
}

impl MigrationService {
    pub fn new(db: DatabaseConnection, history_repo: Arc<HistoryRepository>) -> Self {
        Self { db, history_repo }
    }

    pub fn history_repo(&self) -> &HistoryRepository {
        &self.history_repo
    }

    /// Lists, parses, validates and range-restricts the update directory.
    pub fn load_catalog(
        &self,
        options: &MigrationOptions,
    ) -> Result<Vec<SchemaUpdate>, MigrationError> {
        let files = list_update_files(&options.path)?;
        let catalog = load_catalog(files)?;

        if options.validates_sequence() {
            validate_sequence(&catalog)?;
        } else {
            warn!("Sequence validation disabled, update indices may have gaps");
        }

        Ok(restrict_range(catalog, options.start, options.end)?)
    }

    /// Read-only: a missing history table means nothing was applied yet.
    pub async fn resume_point(
        &self,
        options: &MigrationOptions,
    ) -> Result<Option<SchemaUpdate>, MigrationError> {
        if options.history == HistoryMode::Ignore {
            info!("Ignoring schema update history, every update in range is pending");
            return Ok(None);
        }

        let has_table = self
            .history_repo
            .has_table()
            .await
            .map_err(MigrationError::HistoryLookup)?;
        if !has_table {
            info!("No schema update history table yet");
            return Ok(None);
        }

        self.history_repo
            .last_successful()
            .await
            .map_err(MigrationError::HistoryLookup)
    }

    /// Everything a run decides before touching the schema.
    pub async fn plan(&self, options: &MigrationOptions) -> Result<MigrationPlan, MigrationError> {
        let catalog = self.load_catalog(options)?;
        let last_successful = self.resume_point(options).await?;
        let pending = filter_pending(&catalog, last_successful.as_ref());

        match &last_successful {
            Some(last) => info!(
                "Last successful update is {} ({}), {} of {} update(s) pending",
                last.index,
                last.filename,
                pending.len(),
                catalog.len()
            ),
            None => info!(
                "No prior successful update, {} of {} update(s) pending",
                pending.len(),
                catalog.len()
            ),
        }

        Ok(MigrationPlan {
            catalog,
            last_successful,
            pending,
        })
    }

    pub async fn run(&self, options: &MigrationOptions) -> Result<MigrationReport, MigrationError> {
        let mut state = RunState::Idle;

        enter(&mut state, RunState::Filtering);
        let plan = self.plan(options).await?;

        self.history_repo
            .ensure_table()
            .await
            .map_err(MigrationError::HistoryTable)?;

        if plan.pending.is_empty() {
            info!("Schema is up to date, nothing to apply");
            enter(&mut state, RunState::Committed);
            return Ok(MigrationReport {
                state,
                outcomes: Vec::new(),
                last_successful: plan.last_successful,
            });
        }

        enter(&mut state, RunState::Running);
        let runner = UpdateRunner::new(&options.path);
        let (next, mut outcomes) = if options.is_transactional() {
            self.apply_in_transaction(&runner, &plan.pending).await?
        } else {
            warn!("Transactional safety disabled, each update commits on its own");
            self.apply_each(&runner, &plan.pending).await
        };
        enter(&mut state, next);

        outcomes.sort_by_key(|o| o.index);

        self.history_repo
            .record_outcomes(&outcomes)
            .await
            .map_err(|source| MigrationError::HistoryPersistence {
                count: outcomes.len(),
                state,
                source,
            })?;

        Ok(MigrationReport {
            state,
            outcomes,
            last_successful: plan.last_successful,
        })
    }

    /// All-or-nothing: the first failure rolls back the whole batch.
    async fn apply_in_transaction(
        &self,
        runner: &UpdateRunner,
        pending: &[SchemaUpdate],
    ) -> Result<(RunState, Vec<UpdateOutcome>), MigrationError> {
        let txn = self.db.begin().await.map_err(MigrationError::Connection)?;
        let mut outcomes = Vec::with_capacity(pending.len());

        for update in pending {
            let outcome = runner.apply(&txn, update).await;
            let succeeded = outcome.is_succeeded();
            outcomes.push(outcome);

            if !succeeded {
                warn!(
                    "Update {} failed, rolling back {} applied update(s)",
                    update.filename,
                    outcomes.len() - 1
                );
                if let Err(e) = txn.rollback().await {
                    // Never committed, so the server discards the work regardless.
                    error!("Rollback failed: {}", e);
                }
                return Ok((RunState::RolledBack, abandon_preceding(outcomes)?));
            }
        }

        match txn.commit().await {
            Ok(()) => {
                info!("Committed {} update(s)", outcomes.len());
                Ok((RunState::Committed, outcomes))
            }
            Err(e) => {
                error!("Commit failed, no update was applied: {}", e);
                Ok((
                    RunState::RolledBack,
                    outcomes.into_iter().map(UpdateOutcome::abandoned).collect(),
                ))
            }
        }
    }

    /// Every update is attempted and commits independently.
    async fn apply_each(
        &self,
        runner: &UpdateRunner,
        pending: &[SchemaUpdate],
    ) -> (RunState, Vec<UpdateOutcome>) {
        let mut outcomes = Vec::with_capacity(pending.len());
        for update in pending {
            outcomes.push(runner.apply(&self.db, update).await);
        }
        (RunState::Committed, outcomes)
    }
}
