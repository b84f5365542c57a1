use serde::{Deserialize, Serialize};

use crate::errors::SettingsError;

const MASK: &str = "********";

/// Connection parameters of the database being migrated.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DatabaseConfig {
    /// Full connection URL, takes precedence over the individual parts.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub dbname: Option<String>,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

fn required<'a>(
    value: &'a Option<String>,
    option: &'static str,
    env: &'static str,
) -> Result<&'a str, SettingsError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(SettingsError::MissingOption { option, env })
}

impl DatabaseConfig {
    /// Builds a PostgreSQL URL from the parts unless `url` is set.
    pub fn connection_url(&self) -> Result<String, SettingsError> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) {
            return Ok(url.to_string());
        }

        let host = required(&self.host, "host", "SCHEMA_MANAGER__DATABASE__HOST")?;
        let dbname = required(&self.dbname, "dbname", "SCHEMA_MANAGER__DATABASE__DBNAME")?;
        let user = required(&self.user, "user", "SCHEMA_MANAGER__DATABASE__USER")?;

        let credentials = match self.password.as_deref() {
            Some(password) if !password.is_empty() => format!(
                "{}:{}",
                urlencoding::encode(user),
                urlencoding::encode(password)
            ),
            _ => urlencoding::encode(user).into_owned(),
        };
        let port = self.port.map(|p| format!(":{}", p)).unwrap_or_default();

        Ok(format!(
            "postgres://{}@{}{}/{}",
            credentials,
            host,
            port,
            urlencoding::encode(dbname)
        ))
    }

    /// Human readable target, without credentials.
    pub fn describe(&self) -> String {
        match (&self.url, &self.host, &self.dbname) {
            (Some(url), _, _) if !url.is_empty() => url
                .split_once('@')
                .map(|(scheme, rest)| {
                    let scheme = scheme.split("://").next().unwrap_or_default();
                    format!("{}://{}", scheme, rest)
                })
                .unwrap_or_else(|| url.clone()),
            (_, Some(host), Some(dbname)) => format!("{}/{}", host, dbname),
            _ => "<unconfigured>".to_string(),
        }
    }

    pub fn masked(&self) -> Self {
        Self {
            password: self.password.as_ref().map(|_| MASK.to_string()),
            url: self.url.as_ref().map(|_| self.describe()),
            ..self.clone()
        }
    }
}
