use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Targets that are too chatty at `info`, quieted unless overridden.
const QUIET_TARGETS: [&str; 2] = ["sqlx", "sea_orm"];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory of the daily rolling JSON log.
    #[serde(default)]
    pub dir: Option<String>,

    #[serde(default = "default_console_format")]
    pub console_format: String,

    #[serde(default)]
    pub file_enabled: bool,

    #[serde(
        default = "default_ext_level",
        deserialize_with = "deserialize_ext_level"
    )]
    pub ext_level: Option<HashMap<String, String>>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
            console_format: default_console_format(),
            file_enabled: false,
            ext_level: default_ext_level(),
        }
    }
}

impl LogConfig {
    /// `EnvFilter` directives: the base level followed by per-target overrides.
    pub fn filter_directives(&self) -> String {
        let mut directives = vec![self.level.clone()];
        if let Some(ext_levels) = &self.ext_level {
            let mut targets: Vec<_> = ext_levels.iter().collect();
            targets.sort();
            directives.extend(targets.into_iter().map(|(t, l)| format!("{}={}", t, l)));
        }
        directives.join(",")
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_console_format() -> String {
    "pretty".to_string()
}

fn quiet_targets() -> HashMap<String, String> {
    QUIET_TARGETS
        .iter()
        .map(|t| (t.to_string(), "warn".to_string()))
        .collect()
}

fn default_ext_level() -> Option<HashMap<String, String>> {
    Some(quiet_targets())
}

/// Parses `target:level` pairs separated by commas on top of the quiet defaults.
fn deserialize_ext_level<'de, D>(
    deserializer: D,
) -> Result<Option<HashMap<String, String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;

    let mut map = quiet_targets();
    for pair in s.iter().flat_map(|s| s.split(',')) {
        if let Some((target, level)) = pair.trim().split_once(':') {
            map.insert(target.trim().to_string(), level.trim().to_string());
        }
    }

    Ok(Some(map))
}
