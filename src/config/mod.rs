use std::fmt;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::ValueEnum;
use dotenvy::dotenv;
use serde::Deserialize;

/// Which data service the dashboard talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Hosted table API over HTTP
    #[default]
    Rest,
    /// Direct Postgres connection to the same tables
    Postgres,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Rest => f.write_str("rest"),
            BackendKind::Postgres => f.write_str("postgres"),
        }
    }
}

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Backend selector, `CRM_BACKEND`
    #[serde(default, rename = "crm_backend")]
    pub backend: BackendKind,

    /// Base URL of the hosted data service
    pub supabase_url: Option<String>,

    /// API key of the hosted data service
    pub supabase_anon_key: Option<String>,

    /// Database connection URL
    pub database_url: Option<String>,

    /// Where log output goes; the terminal itself is owned by the UI
    #[serde(default = "default_log_file", rename = "crm_log_file")]
    pub log_file: PathBuf,

    /// Tracing filter directive
    #[serde(default = "default_log_filter", rename = "crm_log")]
    pub log_filter: String,
}

fn default_log_file() -> PathBuf {
    PathBuf::from("crm_dashboard.log")
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Build a configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)?;

        Ok(config)
    }

    /// Check that the selected backend has everything it needs
    pub fn validate(&self) -> Result<()> {
        match self.backend {
            BackendKind::Rest => {
                if self.supabase_url.as_deref().map_or(true, str::is_empty) {
                    bail!("SUPABASE_URL must be set for the rest backend");
                }
                if self.supabase_anon_key.as_deref().map_or(true, str::is_empty) {
                    bail!("SUPABASE_ANON_KEY must be set for the rest backend");
                }
            }
            BackendKind::Postgres => {
                if self.database_url.as_deref().map_or(true, str::is_empty) {
                    bail!("DATABASE_URL must be set for the postgres backend");
                }
            }
        }

        Ok(())
    }

    /// Get the database URL, empty when unset
    pub fn database_url(&self) -> &str {
        self.database_url.as_deref().unwrap_or_default()
    }

    pub fn supabase_url(&self) -> &str {
        self.supabase_url.as_deref().unwrap_or_default()
    }

    pub fn supabase_anon_key(&self) -> &str {
        self.supabase_anon_key.as_deref().unwrap_or_default()
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    // Ensure .env file is loaded
    dotenv().ok();

    // Load the configuration
    let config = Config::load()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_to_rest_backend() {
        let config = Config::from_vars(vars(&[
            ("SUPABASE_URL", "https://demo.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();

        assert_eq!(config.backend, BackendKind::Rest);
        assert_eq!(config.log_file, PathBuf::from("crm_dashboard.log"));
        assert_eq!(config.log_filter, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rest_backend_requires_key() {
        let config = Config::from_vars(vars(&[("SUPABASE_URL", "https://demo.supabase.co")])).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("SUPABASE_ANON_KEY"));
    }

    #[test]
    fn postgres_backend_requires_database_url() {
        let config = Config::from_vars(vars(&[("CRM_BACKEND", "postgres")])).unwrap();
        assert_eq!(config.backend, BackendKind::Postgres);
        assert!(config.validate().is_err());

        let config = Config::from_vars(vars(&[
            ("CRM_BACKEND", "postgres"),
            ("DATABASE_URL", "postgres://localhost/crm"),
            ("CRM_LOG", "debug"),
        ]))
        .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.database_url(), "postgres://localhost/crm");
        assert_eq!(config.log_filter, "debug");
    }
}
