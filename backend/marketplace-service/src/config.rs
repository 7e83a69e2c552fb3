use anyhow::{bail, Context, Result};
use db_pool::env_utils::{parse_env_optional, parse_env_with_default};
use db_pool::DbConfig;
use std::path::PathBuf;
use std::time::Duration;

use crate::services::DEFAULT_PUSH_TIMEOUT;

pub const SERVICE_NAME: &str = "marketplace-service";

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DbConfig,
    pub push: PushConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub run_migrations: bool,
    /// `json` switches the log formatter
    pub log_format: String,
}

#[derive(Debug, Clone)]
pub struct PushConfig {
    pub fcm_project_id: Option<String>,
    pub fcm_service_account_path: Option<PathBuf>,
    pub timeout: Duration,
}

impl PushConfig {
    /// Push is enabled only when both FCM settings are present.
    pub fn fcm_credentials(&self) -> Option<(&str, &PathBuf)> {
        match (&self.fcm_project_id, &self.fcm_service_account_path) {
            (Some(project_id), Some(path)) => Some((project_id.as_str(), path)),
            _ => None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port: u16 = match std::env::var("APP_PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("APP_PORT must be a port number, got {raw:?}"))?,
            Err(_) => 8080,
        };

        let timeout_secs: u64 =
            parse_env_with_default("PUSH_TIMEOUT_SECS", DEFAULT_PUSH_TIMEOUT.as_secs());
        if timeout_secs == 0 {
            bail!("PUSH_TIMEOUT_SECS must be greater than zero");
        }

        let database = DbConfig::from_env(SERVICE_NAME)
            .map_err(anyhow::Error::msg)
            .context("invalid database configuration")?;

        Ok(Config {
            app: AppConfig {
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port,
                run_migrations: parse_env_with_default("RUN_MIGRATIONS", true),
                log_format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
            },
            database,
            push: PushConfig {
                fcm_project_id: parse_env_optional("FCM_PROJECT_ID"),
                fcm_service_account_path: parse_env_optional("FCM_SERVICE_ACCOUNT_PATH"),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}
