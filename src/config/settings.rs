use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

use crate::config::{DatabaseConfig, LogConfig, MigrationConfig};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub migration: MigrationConfig,

    #[serde(default)]
    pub logs: LogConfig,
}

fn get_env_file_name() -> String {
    if let Ok(env_file) = std::env::var("SCHEMA_MANAGER_ENV_FILE") {
        return env_file;
    }
    match std::env::var("SCHEMA_MANAGER_ENV")
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Ok("dev") => ".env.dev".to_string(),
        Ok("test") => ".env.test".to_string(),
        _ => ".env".to_string(),
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::from_filename(get_env_file_name()).ok();

        let settings = Config::builder()
            .add_source(
                Environment::with_prefix("SCHEMA_MANAGER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// JSON rendering with credentials masked.
    pub fn to_masked_json(&self) -> Result<String, serde_json::Error> {
        let masked = Self {
            database: self.database.masked(),
            ..self.clone()
        };
        serde_json::to_string_pretty(&masked)
    }
}
