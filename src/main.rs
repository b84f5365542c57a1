use std::process::ExitCode;

use schema_manager::{
    cli::{Cli, ExitOnErr},
    config::Settings,
    utils,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let settings = if cli.needs_settings() {
        Settings::new().exit_on_err("Failed to load configuration")
    } else {
        Settings::default()
    };
    let settings = cli.settings(settings);

    let _guard = utils::logger::init_logging(&settings.logs);

    cli.execute(&settings).await
}
