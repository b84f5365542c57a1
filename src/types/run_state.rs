use colored::*;
use serde::Serialize;
use strum_macros::Display;

/// Lifecycle of one migration run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Display, Default)]
#[strum(serialize_all = "lowercase")]
pub enum RunState {
    #[default]
    Idle,
    Filtering,
    Running,
    Committed,
    #[strum(serialize = "rolled back")]
    RolledBack,
}

impl RunState {
    pub fn to_colored_string(&self) -> String {
        match self {
            RunState::Idle => "IDLE".bright_black().to_string(),
            RunState::Filtering => "FILTERING".blue().to_string(),
            RunState::Running => "RUNNING".blue().bold().to_string(),
            RunState::Committed => "COMMITTED".green().bold().to_string(),
            RunState::RolledBack => "ROLLED BACK".red().bold().to_string(),
        }
    }
}
