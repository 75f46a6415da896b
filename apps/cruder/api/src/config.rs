use axum_helpers::ApiKeyConfig;
use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, server::ServerConfig};
use database::postgres::PostgresConfig;
use std::str::FromStr;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Where users are stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// Process-local storage for local development; lost on restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(ConfigError::InvalidValue {
                key: "STORAGE_BACKEND".to_string(),
                details: format!("expected 'postgres' or 'memory', got '{}'", other),
            }),
        }
    }
}

/// Application-specific configuration
///
/// Read once at startup and passed down explicitly; request handling never
/// touches the environment. Secrets are redacted in `Debug`.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub auth: ApiKeyConfig,
    pub storage: StorageBackend,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app: app_info!(),
            database: PostgresConfig::from_env()?, // POSTGRES_DSN, then DATABASE_URL
            server: ServerConfig::from_env()?,     // HOST=0.0.0.0, PORT=8080
            environment: Environment::from_env(),
            auth: ApiKeyConfig::from_env()?,
            storage: env_or_default("STORAGE_BACKEND", "postgres").parse()?,
        })
    }
}
