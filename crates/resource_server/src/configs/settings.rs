use std::path::PathBuf;

use common_utils::errors::{ApplicationError, ApplicationResult};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: Server,
    pub log: Log,
    pub consent_store: ConsentStoreConfig,
    pub database: Database,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: 8,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    pub console: ConsoleLog,
    pub file: FileLog,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ConsoleLog {
    pub enabled: bool,
    pub level: String,
    pub log_format: LogFormat,
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "DEBUG".to_string(),
            log_format: LogFormat::Default,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FileLog {
    pub enabled: bool,
    pub path: String,
    pub file_name: String,
    pub level: String,
}

impl Default for FileLog {
    fn default() -> Self {
        Self {
            enabled: false,
            path: "logs".to_string(),
            file_name: "debug.log".to_string(),
            level: "DEBUG".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Default,
    Json,
}

/// Connection details for the external consent store. With `mock` enabled the
/// server runs against an in-memory consent store instead, which is what the
/// test suites use.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ConsentStoreConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub mock: bool,
}

impl Default for ConsentStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9090".to_string(),
            timeout_secs: 10,
            mock: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Database {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub pool_size: u32,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            host: "localhost".to_string(),
            port: 5432,
            dbname: String::new(),
            pool_size: 5,
        }
    }
}

impl Database {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.dbname
        )
    }
}

impl Settings {
    pub fn new() -> ApplicationResult<Self> {
        Self::with_config_path(None)
    }

    /// Build settings from the given config file (falling back to
    /// `RESOURCE_SERVER_CONFIG_PATH`, then `config/development.toml`),
    /// overridden by `RESOURCE_SERVER__`-prefixed environment variables.
    pub fn with_config_path(config_path: Option<PathBuf>) -> ApplicationResult<Self> {
        let config_path = config_path
            .or_else(|| std::env::var_os("RESOURCE_SERVER_CONFIG_PATH").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("config/development.toml"));

        let config = config::Config::builder()
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("RESOURCE_SERVER")
                    .try_parsing(true)
                    .separator("__"),
            )
            .build()
            .map_err(|err| ApplicationError::ConfigurationError(err.to_string()))?;

        config
            .try_deserialize()
            .map_err(|err| ApplicationError::ConfigurationError(err.to_string()))
    }
}
