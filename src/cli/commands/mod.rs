pub mod cmd_apply;
pub mod cmd_config;
pub mod cmd_history;
pub mod cmd_plan;
pub mod cmd_version;
pub mod shared;

use clap::Subcommand;

use crate::cli::commands::{
    cmd_apply::RunArgs, cmd_config::ConfigCommands, cmd_history::HistoryArgs,
    cmd_version::VersionCommand,
};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending schema updates
    Apply(RunArgs),

    /// List pending schema updates without applying them
    Plan(RunArgs),

    /// Show recorded schema update outcomes
    History(HistoryArgs),

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Print version
    Version(VersionCommand),
}

pub trait ExitOnErr<T> {
    fn exit_on_err(self, msg: &str) -> T;
}

impl<T, E: std::fmt::Display> ExitOnErr<T> for Result<T, E> {
    fn exit_on_err(self, msg: &str) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("❌ {}: {}", msg, e);
                std::process::exit(cmd_apply::EXIT_FATAL.into());
            }
        }
    }
}
