use std::process::ExitCode;

use clap::Args;
use colored::Colorize;
use tabled::Tabled;

use crate::{
    cli::commands::{
        ExitOnErr,
        shared::{ConnectionArgs, MigrationArgs, render_table},
    },
    config::Settings,
    services::AppServices,
    types::{MigrationReport, RunState, UpdateOutcome, UpdateResult},
    utils::{format_duration, format_timestamp},
};

pub const EXIT_FATAL: u8 = 1;
pub const EXIT_ROLLED_BACK: u8 = 3;
pub const EXIT_HISTORY_OUT_OF_SYNC: u8 = 4;

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub migration: MigrationArgs,
}

impl RunArgs {
    /// Settings with the command line flags layered on top.
    pub fn settings(&self, settings: &Settings) -> Settings {
        let mut settings = settings.clone();
        self.connection.apply_to(&mut settings.database);
        self.migration.apply_to(&mut settings.migration);
        settings
    }
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "#")]
    index: i64,

    #[tabled(rename = "Update")]
    name: String,

    #[tabled(rename = "File")]
    filename: String,

    #[tabled(rename = "Started At")]
    started_at: String,

    #[tabled(rename = "Duration")]
    duration: String,

    #[tabled(rename = "Result")]
    result: String,
}

impl From<&UpdateOutcome> for OutcomeRow {
    fn from(outcome: &UpdateOutcome) -> Self {
        Self {
            index: outcome.index,
            name: outcome.name.clone(),
            filename: outcome.filename.clone(),
            started_at: format_timestamp(outcome.started_at),
            duration: format_duration(outcome.started_at, outcome.ended_at),
            result: outcome.result.to_colored_string(),
        }
    }
}

pub fn exit_status(report: &MigrationReport) -> u8 {
    if report.is_success() {
        0
    } else {
        EXIT_ROLLED_BACK
    }
}

pub async fn execute(args: &RunArgs, settings: &Settings) -> ExitCode {
    let settings = args.settings(settings);
    let options = settings
        .migration
        .resolve()
        .exit_on_err("Invalid migration options");
    let services = AppServices::new(&settings)
        .await
        .exit_on_err("Failed to connect to database");

    match services.migration_service.run(&options).await {
        Ok(report) => {
            print_report(&report);
            ExitCode::from(exit_status(&report))
        }
        Err(e) if e.is_history_persistence() => {
            eprintln!("{} {}", "❌ HISTORY OUT OF SYNC:".red().bold(), e);
            eprintln!(
                "   Reconcile the schema_update_history table with the database before the next run."
            );
            ExitCode::from(EXIT_HISTORY_OUT_OF_SYNC)
        }
        Err(e) => {
            eprintln!("❌ Migration aborted: {}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn print_report(report: &MigrationReport) {
    if report.outcomes.is_empty() {
        println!("✅ Schema is up to date, no updates applied");
        return;
    }

    println!("{}", render_table(report.outcomes.iter().map(OutcomeRow::from)));

    let summary = format!(
        "{} succeeded, {} failed, {} abandoned",
        report.count(UpdateResult::Succeeded),
        report.count(UpdateResult::Failed),
        report.count(UpdateResult::Abandoned)
    );
    match report.state {
        RunState::Committed if !report.has_failures() => {
            println!("✅ {}: {}", report.state.to_colored_string(), summary)
        }
        _ => eprintln!("❌ {}: {}", report.state.to_colored_string(), summary),
    }
}
