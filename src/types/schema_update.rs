use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{RunState, UpdateResult};

/// One update file of the catalog. The index is always derived from the filename.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SchemaUpdate {
    pub name: String,
    pub index: i64,
    pub filename: String,
}

impl SchemaUpdate {
    pub fn new(name: impl Into<String>, index: i64, filename: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index,
            filename: filename.into(),
        }
    }
}

/// Recorded result of attempting one update.
///
/// Outcomes are never edited in place: every transition consumes the value and
/// returns a new record, which is what ends up appended to the history table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    pub name: String,
    pub index: i64,
    pub filename: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub result: UpdateResult,
}

impl UpdateOutcome {
    pub fn started(update: &SchemaUpdate, started_at: DateTime<Utc>) -> Self {
        Self {
            name: update.name.clone(),
            index: update.index,
            filename: update.filename.clone(),
            started_at,
            ended_at: None,
            result: UpdateResult::Started,
        }
    }

    pub fn succeeded(self, ended_at: DateTime<Utc>) -> Self {
        Self {
            ended_at: Some(ended_at),
            result: UpdateResult::Succeeded,
            ..self
        }
    }

    pub fn failed(self, ended_at: DateTime<Utc>) -> Self {
        Self {
            ended_at: Some(ended_at),
            result: UpdateResult::Failed,
            ..self
        }
    }

    /// Keeps the timings of the original attempt.
    pub fn abandoned(self) -> Self {
        Self {
            result: UpdateResult::Abandoned,
            ..self
        }
    }

    pub fn is_succeeded(&self) -> bool {
        self.result == UpdateResult::Succeeded
    }

    pub fn update(&self) -> SchemaUpdate {
        SchemaUpdate::new(self.name.clone(), self.index, self.filename.clone())
    }
}

/// Updates a run would attempt, and why.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MigrationPlan {
    pub catalog: Vec<SchemaUpdate>,
    pub last_successful: Option<SchemaUpdate>,
    pub pending: Vec<SchemaUpdate>,
}

/// What a run did, handed back to the CLI.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MigrationReport {
    pub state: RunState,
    pub outcomes: Vec<UpdateOutcome>,
    pub last_successful: Option<SchemaUpdate>,
}

impl MigrationReport {
    pub fn has_failures(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| o.result == UpdateResult::Failed)
    }

    /// Committed with every attempted update applied, including the nothing-to-do case.
    pub fn is_success(&self) -> bool {
        self.state == RunState::Committed && !self.has_failures()
    }

    pub fn count(&self, result: UpdateResult) -> usize {
        self.outcomes.iter().filter(|o| o.result == result).count()
    }
}
