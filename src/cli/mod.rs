mod commands;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

pub use crate::cli::commands::{
    Commands, ExitOnErr, cmd_apply, cmd_config, cmd_history, cmd_plan, cmd_version,
};
use crate::config::Settings;

#[derive(Parser, Debug)]
#[command(
    name = "schema-manager",
    about = "Applies ordered SQL schema updates and records their history",
    long_about = format!(
r#"{} - {}
Updates are files named <digits>-<name>.sql, applied in index order inside one transaction."#,
"SCHEMA MANAGER".green().bold(),
"Incremental, auditable schema updates.",
))]
pub struct Cli {
    /// Overrides the configured log level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// `version` must work even when the environment holds broken settings.
    pub fn needs_settings(&self) -> bool {
        !matches!(self.command, Commands::Version(_))
    }

    /// Settings with global flags applied.
    pub fn settings(&self, settings: Settings) -> Settings {
        let mut settings = settings;
        if let Some(level) = &self.log_level {
            settings.logs.level = level.clone();
        }
        settings
    }

    pub async fn execute(&self, settings: &Settings) -> ExitCode {
        match &self.command {
            Commands::Apply(args) => cmd_apply::execute(args, settings).await,
            Commands::Plan(args) => cmd_plan::execute(args, settings).await,
            Commands::History(args) => cmd_history::execute(args, settings).await,
            Commands::Config { action } => cmd_config::execute(action, settings).await,
            Commands::Version(action) => cmd_version::execute(action).await,
        }
    }
}
