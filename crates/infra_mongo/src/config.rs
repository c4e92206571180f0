//! Environment configuration

use serde::Deserialize;
use std::time::Duration;

use crate::client::DatabaseConfig;

/// MongoDB settings loaded from `MONGO_*` environment variables
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MongoSettings {
    /// Connection string
    pub uri: String,
    /// Database name
    pub database: String,
    /// Application name reported to the server
    pub app_name: Option<String>,
    /// Maximum pool size
    pub max_pool_size: u32,
    /// Minimum pool size
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Server selection timeout in seconds
    pub server_selection_timeout_secs: u64,
    /// Idle connection timeout in seconds
    pub max_idle_time_secs: u64,
    /// Log level
    pub log_level: String,
    /// Log output format: "pretty" or "json"
    pub log_format: String,
}

impl Default for MongoSettings {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "app".to_string(),
            app_name: None,
            max_pool_size: 10,
            min_pool_size: 2,
            connect_timeout_secs: 30,
            server_selection_timeout_secs: 30,
            max_idle_time_secs: 600,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl MongoSettings {
    /// Loads settings from the environment (`MONGO_URI`, `MONGO_DATABASE`, ...)
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(config::Environment::with_prefix("MONGO").try_parsing(true))
    }

    /// Loads settings from any `config` source
    pub fn from_source<S>(source: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    /// True when logs should be emitted as JSON lines
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    /// Converts the settings into client configuration
    pub fn database_config(&self) -> DatabaseConfig {
        let mut config = DatabaseConfig::new(&self.uri, &self.database)
            .max_pool_size(self.max_pool_size)
            .min_pool_size(self.min_pool_size)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .server_selection_timeout(Duration::from_secs(self.server_selection_timeout_secs))
            .max_idle_time(Duration::from_secs(self.max_idle_time_secs));
        if let Some(app_name) = &self.app_name {
            config = config.app_name(app_name);
        }
        config
    }
}

impl From<MongoSettings> for DatabaseConfig {
    fn from(settings: MongoSettings) -> Self {
        settings.database_config()
    }
}
