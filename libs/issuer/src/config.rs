use anyhow::{Context, Result};

use crate::db::DbConfig;
use crate::issuer::{IssuerConfig, DEFAULT_MAX_ATTEMPTS};

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_json: bool,
    pub dev_mode: bool,
    pub database: DbConfig,
    pub issuer: IssuerConfig,
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let log_level = std::env::var("COREID_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        let log_json = env_flag("COREID_LOG_JSON");

        let dev_mode = env_flag("COREID_DEV");

        let max_attempts = match std::env::var("COREID_MAX_ISSUE_ATTEMPTS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("COREID_MAX_ISSUE_ATTEMPTS must be a number, got '{raw}'"))?,
            Err(_) => DEFAULT_MAX_ATTEMPTS,
        };

        let database = DbConfig::from_env();

        Ok(Self {
            log_level,
            log_json,
            dev_mode,
            database,
            issuer: IssuerConfig { max_attempts },
        })
    }
}
