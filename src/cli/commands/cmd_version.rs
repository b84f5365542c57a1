use std::process::ExitCode;

use clap::Args;
use clap::crate_version;

#[derive(Args, Debug)]
pub struct VersionCommand;

pub async fn execute(_: &VersionCommand) -> ExitCode {
    println!("schema-manager version: {}", crate_version!());
    ExitCode::SUCCESS
}
