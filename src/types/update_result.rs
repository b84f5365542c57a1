use colored::*;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum UpdateResult {
    #[sea_orm(string_value = "started")]
    #[default]
    Started,

    #[sea_orm(string_value = "succeeded")]
    Succeeded,

    #[sea_orm(string_value = "failed")]
    Failed,

    /// Succeeded on its own, then undone by the rollback of its batch.
    #[sea_orm(string_value = "abandoned")]
    Abandoned,
}

impl UpdateResult {
    pub fn to_colored_string(&self) -> String {
        match self {
            UpdateResult::Started => "STARTED".blue().bold().to_string(),
            UpdateResult::Succeeded => "SUCCEEDED".green().bold().to_string(),
            UpdateResult::Failed => "FAILED".red().bold().to_string(),
            UpdateResult::Abandoned => "ABANDONED".yellow().bold().to_string(),
        }
    }
}
