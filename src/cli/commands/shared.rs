use std::path::PathBuf;

use clap::Args;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::{
    config::{DatabaseConfig, MigrationConfig},
    types::HistoryMode,
    utils::validate_dir,
};

/// Connection flags, each overriding the matching `database` setting.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Database host
    #[arg(long)]
    pub host: Option<String>,

    /// Database port
    #[arg(long)]
    pub port: Option<u16>,

    /// Database name
    #[arg(long)]
    pub dbname: Option<String>,

    /// Database user
    #[arg(long)]
    pub user: Option<String>,

    /// Database password
    #[arg(long)]
    pub password: Option<String>,

    /// Full database URL, takes precedence over host, port, dbname, user and password
    #[arg(long)]
    pub url: Option<String>,
}

impl ConnectionArgs {
    pub fn apply_to(&self, config: &mut DatabaseConfig) {
        fn set<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                target.clone_from(value);
            }
        }
        set(&mut config.host, &self.host);
        set(&mut config.port, &self.port);
        set(&mut config.dbname, &self.dbname);
        set(&mut config.user, &self.user);
        set(&mut config.password, &self.password);
        set(&mut config.url, &self.url);
    }
}

/// Flags selecting and guarding the updates of a run.
#[derive(Args, Debug, Clone, Default)]
pub struct MigrationArgs {
    /// Directory of `<digits>-<name>.sql` update files
    #[arg(long, value_name = "DIR", value_parser = validate_dir)]
    pub path: Option<PathBuf>,

    /// Use or ignore the schema update history when picking the resume point
    #[arg(long, value_enum)]
    pub history: Option<HistoryMode>,

    /// Skip sequence validation and apply every update in its own transaction
    #[arg(long, conflicts_with = "validate")]
    pub novalidate: bool,

    /// Force validation and the wrapping transaction, overriding a configured `novalidate`
    #[arg(long)]
    pub validate: bool,

    /// Lowest update index to consider, inclusive
    #[arg(long)]
    pub start: Option<i64>,

    /// Highest update index to consider, inclusive
    #[arg(long)]
    pub end: Option<i64>,
}

impl MigrationArgs {
    pub fn apply_to(&self, config: &mut MigrationConfig) {
        if let Some(path) = &self.path {
            config.path = Some(path.clone());
        }
        if let Some(history) = self.history {
            config.history = history;
        }
        if self.novalidate {
            config.novalidate = true;
        } else if self.validate {
            config.novalidate = false;
        }
        if self.start.is_some() {
            config.start = self.start;
        }
        if self.end.is_some() {
            config.end = self.end;
        }
    }
}

pub fn render_table<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::left()))
        .to_string()
}
