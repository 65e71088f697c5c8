//! Configuration loading and management.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bot identity and command behaviour.
    pub bot: BotConfig,
    /// IRC server to connect to.
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Reconnect backoff.
    #[serde(default)]
    pub reconnect: ReconnectConfig,
    /// Optional Prometheus endpoint.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Nickname the bot registers with; messages from this nick are ignored.
    pub nick: String,
    /// Ident sent in USER.
    #[serde(default = "default_username")]
    pub username: String,
    /// Realname sent in USER.
    #[serde(default = "default_realname")]
    pub realname: String,
    /// Literal prefix marking a line as a command (e.g. ".").
    #[serde(default = "default_prefix")]
    pub command_prefix: String,
    /// Nick or channel that receives handler fault diagnostics.
    pub operator: String,
    /// Partition key stamped on every stored quote.
    #[serde(default = "default_network")]
    pub network: String,
}

/// IRC server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// `host:port` to connect to.
    pub address: String,
    /// Channels joined after registration.
    #[serde(default)]
    pub channels: Vec<String>,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file, or `:memory:`.
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Reconnect backoff configuration.
///
/// The delay starts at `initial_delay_secs`, doubles after every failed
/// attempt and is capped at `max_delay_secs`. A successful registration
/// resets it.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconnectConfig {
    #[serde(default = "default_initial_delay")]
    pub initial_delay_secs: u64,
    #[serde(default = "default_max_delay")]
    pub max_delay_secs: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay_secs: default_initial_delay(),
            max_delay_secs: default_max_delay(),
        }
    }
}

impl ReconnectConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_secs)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_secs(self.max_delay_secs)
    }
}

/// Metrics endpoint configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsConfig {
    /// Port for `GET /metrics`. Disabled when absent.
    pub port: Option<u16>,
}

fn default_username() -> String {
    "automaton".to_string()
}

fn default_realname() -> String {
    "automaton IRC bot".to_string()
}

fn default_prefix() -> String {
    ".".to_string()
}

fn default_network() -> String {
    "slashnet".to_string()
}

fn default_db_path() -> String {
    "automaton.db".to_string()
}

fn default_initial_delay() -> u64 {
    1
}

fn default_max_delay() -> u64 {
    300
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the bot cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.nick.trim().is_empty() {
            return Err(ConfigError::Invalid("bot.nick must not be empty".into()));
        }
        if self.bot.command_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "bot.command_prefix must not be empty".into(),
            ));
        }
        if self.bot.operator.trim().is_empty() {
            return Err(ConfigError::Invalid("bot.operator must not be empty".into()));
        }
        if self.reconnect.max_delay_secs < self.reconnect.initial_delay_secs {
            return Err(ConfigError::Invalid(format!(
                "reconnect.max_delay_secs ({}) is below initial_delay_secs ({})",
                self.reconnect.max_delay_secs, self.reconnect.initial_delay_secs
            )));
        }
        Ok(())
    }
}
