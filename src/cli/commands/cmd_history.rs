use std::process::ExitCode;

use clap::Args;
use tabled::Tabled;

use crate::{
    cli::commands::{ExitOnErr, shared::ConnectionArgs, shared::render_table},
    config::Settings,
    entities::HistoryModel,
    services::AppServices,
    utils::{format_duration, format_timestamp},
};

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Number of most recent rows to show
    #[arg(short, long, default_value = "20")]
    pub limit: u64,
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "ID")]
    id: i32,

    #[tabled(rename = "#")]
    index: i64,

    #[tabled(rename = "Update")]
    name: String,

    #[tabled(rename = "File")]
    file_name: String,

    #[tabled(rename = "Started At")]
    started_at: String,

    #[tabled(rename = "Duration")]
    duration: String,

    #[tabled(rename = "Result")]
    result: String,
}

impl From<HistoryModel> for HistoryRow {
    fn from(row: HistoryModel) -> Self {
        Self {
            id: row.id,
            index: row.index,
            started_at: format_timestamp(row.started_at),
            duration: format_duration(row.started_at, row.ended_at),
            result: row.result.to_colored_string(),
            name: row.name,
            file_name: row.file_name,
        }
    }
}

pub async fn execute(args: &HistoryArgs, settings: &Settings) -> ExitCode {
    let mut settings = settings.clone();
    args.connection.apply_to(&mut settings.database);

    let services = AppServices::new(&settings)
        .await
        .exit_on_err("Failed to connect to database");
    let repo = services.migration_service.history_repo();

    let has_table = repo
        .has_table()
        .await
        .exit_on_err("Failed to read schema update history");
    if !has_table {
        println!("No schema updates recorded");
        return ExitCode::SUCCESS;
    }

    let rows = repo
        .list(Some(args.limit))
        .await
        .exit_on_err("Failed to read schema update history");

    if rows.is_empty() {
        println!("No schema updates recorded");
    } else {
        println!("{}", render_table(rows.into_iter().map(HistoryRow::from)));
    }
    ExitCode::SUCCESS
}
