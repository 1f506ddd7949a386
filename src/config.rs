use std::env;

use anyhow::{anyhow, Result};

pub const DEFAULT_FOTMOB_BASE_URL: &str = "https://www.fotmob.com";
/// Liga MX
pub const DEFAULT_LEAGUE_ID: u32 = 230;
pub const DEFAULT_LEAGUE_TIMEZONE: &str = "America/Mexico_City";

/// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Required unless `dry_run` is set
    pub database_url: Option<String>,
    pub fotmob_base_url: String,
    pub league_id: u32,
    pub league_timezone: String,
    pub http_timeout_seconds: u64,
    /// Sync into memory and log the result instead of writing to Postgres
    pub dry_run: bool,
    /// Create the tables before syncing if they do not exist
    pub ensure_schema: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. A key that is present but blank is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| -> Result<Option<String>> {
            match lookup(key) {
                Some(v) if v.trim().is_empty() => Err(anyhow!("{} is set but empty", key)),
                Some(v) => Ok(Some(v.trim().to_string())),
                None => Ok(None),
            }
        };
        let flag = |key: &str| -> Result<bool> {
            Ok(var(key)?.map(|v| v.to_lowercase() == "true").unwrap_or(false))
        };

        let dry_run = flag("DRY_RUN")?;
        let database_url = var("DATABASE_URL")?;
        if database_url.is_none() && !dry_run {
            return Err(anyhow!("DATABASE_URL is not set (set DRY_RUN=true to sync without a database)"));
        }

        Ok(Self {
            database_url,
            fotmob_base_url: var("FOTMOB_BASE_URL")?
                .unwrap_or_else(|| DEFAULT_FOTMOB_BASE_URL.to_string()),
            league_id: var("LEAGUE_ID")?
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_LEAGUE_ID),
            league_timezone: var("LEAGUE_TIMEZONE")?
                .unwrap_or_else(|| DEFAULT_LEAGUE_TIMEZONE.to_string()),
            http_timeout_seconds: var("HTTP_TIMEOUT_SECONDS")?
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            dry_run,
            ensure_schema: flag("ENSURE_SCHEMA")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/liga")]).unwrap();
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/liga"));
        assert_eq!(config.fotmob_base_url, DEFAULT_FOTMOB_BASE_URL);
        assert_eq!(config.league_id, 230);
        assert_eq!(config.league_timezone, "America/Mexico_City");
        assert_eq!(config.http_timeout_seconds, 30);
        assert!(!config.dry_run);
        assert!(!config.ensure_schema);
    }

    #[test]
    fn database_url_is_required_outside_dry_run() {
        assert!(config_from(&[]).is_err());

        let config = config_from(&[("DRY_RUN", "TRUE")]).unwrap();
        assert!(config.dry_run);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn blank_values_are_rejected() {
        let err = config_from(&[("DATABASE_URL", "  ")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL is set but empty"));
    }

    #[test]
    fn unparseable_numbers_fall_back_to_defaults() {
        let config = config_from(&[
            ("DRY_RUN", "true"),
            ("LEAGUE_ID", "liga"),
            ("HTTP_TIMEOUT_SECONDS", "5"),
        ])
        .unwrap();
        assert_eq!(config.league_id, 230);
        assert_eq!(config.http_timeout_seconds, 5);
    }
}
