use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{errors::SettingsError, types::HistoryMode};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct MigrationConfig {
    /// Directory holding `<digits>-<name>.sql` files.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default)]
    pub history: HistoryMode,

    /// Disables both sequence validation and the wrapping transaction.
    #[serde(default)]
    pub novalidate: bool,

    #[serde(default)]
    pub start: Option<i64>,

    #[serde(default)]
    pub end: Option<i64>,
}

/// Fully resolved options of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOptions {
    pub path: PathBuf,
    pub history: HistoryMode,
    pub novalidate: bool,
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl MigrationOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            history: HistoryMode::default(),
            novalidate: false,
            start: None,
            end: None,
        }
    }

    pub fn is_transactional(&self) -> bool {
        !self.novalidate
    }

    pub fn validates_sequence(&self) -> bool {
        !self.novalidate
    }
}

impl MigrationConfig {
    pub fn resolve(&self) -> Result<MigrationOptions, SettingsError> {
        let path = self
            .path
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(SettingsError::MissingOption {
                option: "path",
                env: "SCHEMA_MANAGER__MIGRATION__PATH",
            })?;

        Ok(MigrationOptions {
            path,
            history: self.history,
            novalidate: self.novalidate,
            start: self.start,
            end: self.end,
        })
    }
}
