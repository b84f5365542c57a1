mod history_mode;
mod run_state;
mod schema_update;
mod update_result;

pub use history_mode::HistoryMode;
pub use run_state::RunState;
pub use schema_update::{MigrationPlan, MigrationReport, SchemaUpdate, UpdateOutcome};
pub use update_result::UpdateResult;
