use std::process::ExitCode;

use clap::Subcommand;

use crate::{cli::commands::ExitOnErr, config::Settings};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the resolved configuration, credentials masked
    Show,
}

pub async fn execute(action: &ConfigCommands, settings: &Settings) -> ExitCode {
    match action {
        ConfigCommands::Show => {
            let json = settings
                .to_masked_json()
                .exit_on_err("Failed to serialize settings");
            println!("{}", json);
        }
    }
    ExitCode::SUCCESS
}
