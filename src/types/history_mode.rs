use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Whether the history table decides the resume point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HistoryMode {
    #[default]
    Use,
    /// Treat every update in range as pending. Outcomes are still recorded.
    Ignore,
}
