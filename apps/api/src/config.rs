//! # API Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PORT=9000  DB_PATH=/var/lib/storefront.db                          │
//! │     CHECKOUT_LOCK_STRATEGY=optimistic                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $STOREFRONT_CONFIG, or ./storefront.toml when present              │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 8080
//!
//! [database]
//! path = "storefront.db"
//! max_connections = 5
//! busy_timeout_ms = 5000
//!
//! [checkout]
//! lock_strategy = "pessimistic"  # pessimistic | optimistic
//! max_attempts = 3
//!
//! [log]
//! level = "info"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use storefront_db::DbConfig;
use storefront_service::{LockStrategy, DEFAULT_MAX_ATTEMPTS};

/// Config file read when `STOREFRONT_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "storefront.toml";

// =============================================================================
// Errors
// =============================================================================

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file; created on first start.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a connection waits on a locked database.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    /// `pessimistic` or `optimistic`.
    #[serde(default = "default_lock_strategy")]
    pub lock_strategy: String,

    /// Attempt budget in optimistic mode.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    /// Default `tracing` filter; `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_db_path() -> PathBuf {
    PathBuf::from("storefront.db")
}
fn default_max_connections() -> u32 {
    5
}
fn default_busy_timeout_ms() -> u64 {
    5000
}
fn default_lock_strategy() -> String {
    "pessimistic".to_string()
}
fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            lock_strategy: default_lock_strategy(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            level: default_log_level(),
        }
    }
}

// =============================================================================
// ApiConfig
// =============================================================================

/// Complete server configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,

    #[serde(default)]
    pub log: LogSettings,
}

impl ApiConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file
    /// 3. Environment variables
    pub fn load() -> ConfigResult<Self> {
        let explicit = std::env::var_os("STOREFRONT_CONFIG").map(PathBuf::from);

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reads one TOML file; missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Applies overrides from a variable lookup (the process environment in
    /// [`ApiConfig::load`]).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("STOREFRONT_BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_var("PORT", &port)?;
        }
        if let Some(path) = lookup("DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }
        if let Some(max) = lookup("DB_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("DB_MAX_CONNECTIONS", &max)?;
        }
        if let Some(ms) = lookup("DB_BUSY_TIMEOUT_MS") {
            self.database.busy_timeout_ms = parse_var("DB_BUSY_TIMEOUT_MS", &ms)?;
        }
        if let Some(strategy) = lookup("CHECKOUT_LOCK_STRATEGY") {
            debug!(strategy = %strategy, "Overriding lock strategy from environment");
            self.checkout.lock_strategy = strategy;
        }
        if let Some(attempts) = lookup("CHECKOUT_MAX_ATTEMPTS") {
            self.checkout.max_attempts = parse_var("CHECKOUT_MAX_ATTEMPTS", &attempts)?;
        }
        if let Some(level) = lookup("RUST_LOG") {
            self.log.level = level;
        }
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be greater than 0".into()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }
        if self.checkout.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "checkout.max_attempts must be greater than 0".into(),
            ));
        }
        self.lock_strategy()?;
        Ok(())
    }

    /// The configured strategy with its attempt budget.
    pub fn lock_strategy(&self) -> ConfigResult<LockStrategy> {
        let strategy: LockStrategy =
            self.checkout
                .lock_strategy
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "checkout.lock_strategy".to_string(),
                    value: self.checkout.lock_strategy.clone(),
                })?;
        Ok(strategy.with_max_attempts(self.checkout.max_attempts))
    }

    /// Pool settings for the store.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path)
            .max_connections(self.database.max_connections)
            .busy_timeout(Duration::from_millis(self.database.busy_timeout_ms))
    }

    /// `addr:port` to listen on.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.bind_addr, self.server.port)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.database.path, PathBuf::from("storefront.db"));
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.busy_timeout_ms, 5000);
        assert_eq!(config.lock_strategy().unwrap(), LockStrategy::Pessimistic);
        assert_eq!(config.log.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ApiConfig::from_toml(
            r#"
            [server]
            port = 9000

            [checkout]
            lock_strategy = "optimistic"
            max_attempts = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(
            config.lock_strategy().unwrap(),
            LockStrategy::Optimistic { max_attempts: 7 }
        );
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = ApiConfig::from_toml("[server]\nport = 9000\n").unwrap();
        config
            .apply_overrides(env(&[
                ("PORT", "3000"),
                ("DB_PATH", "/tmp/shop.db"),
                ("DB_BUSY_TIMEOUT_MS", "250"),
                ("CHECKOUT_LOCK_STRATEGY", "Optimistic"),
                ("CHECKOUT_MAX_ATTEMPTS", "4"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.path, PathBuf::from("/tmp/shop.db"));
        assert_eq!(config.db_config().busy_timeout, Duration::from_millis(250));
        assert_eq!(
            config.lock_strategy().unwrap(),
            LockStrategy::Optimistic { max_attempts: 4 }
        );
    }

    #[test]
    fn test_unparseable_env_value_is_rejected() {
        let mut config = ApiConfig::default();
        let err = config.apply_overrides(env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "PORT"));
    }

    #[test]
    fn test_validation() {
        let mut config = ApiConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = ApiConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        let mut config = ApiConfig::default();
        config.checkout.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = ApiConfig::default();
        config.checkout.lock_strategy = "eventual".to_string();
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(&path, "[database]\npath = \"shop.db\"\nmax_connections = 2\n").unwrap();

        let config = ApiConfig::from_file(&path).unwrap();
        assert_eq!(config.database.path, PathBuf::from("shop.db"));
        assert_eq!(config.db_config().max_connections, 2);

        let err = ApiConfig::from_file(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
