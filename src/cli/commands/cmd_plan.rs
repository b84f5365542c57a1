use std::process::ExitCode;

use tabled::Tabled;

use crate::{
    cli::commands::{ExitOnErr, cmd_apply::RunArgs, shared::render_table},
    config::Settings,
    services::AppServices,
    types::SchemaUpdate,
};

#[derive(Tabled)]
struct PendingRow {
    #[tabled(rename = "#")]
    index: i64,

    #[tabled(rename = "Update")]
    name: String,

    #[tabled(rename = "File")]
    filename: String,
}

impl From<&SchemaUpdate> for PendingRow {
    fn from(update: &SchemaUpdate) -> Self {
        Self {
            index: update.index,
            name: update.name.clone(),
            filename: update.filename.clone(),
        }
    }
}

/// Shows what `apply` would run, without running it.
pub async fn execute(args: &RunArgs, settings: &Settings) -> ExitCode {
    let settings = args.settings(settings);
    let options = settings
        .migration
        .resolve()
        .exit_on_err("Invalid migration options");
    let services = AppServices::new(&settings)
        .await
        .exit_on_err("Failed to connect to database");

    let plan = services
        .migration_service
        .plan(&options)
        .await
        .exit_on_err("Failed to plan migration");

    match &plan.last_successful {
        Some(last) => println!("Last successful update: {} ({})", last.index, last.filename),
        None => println!("No successful update recorded"),
    }

    if plan.pending.is_empty() {
        println!("✅ Schema is up to date");
    } else {
        println!("{}", render_table(plan.pending.iter().map(PendingRow::from)));
        println!(
            "{} of {} update(s) pending",
            plan.pending.len(),
            plan.catalog.len()
        );
    }
    ExitCode::SUCCESS
}
