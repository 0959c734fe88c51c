//! Core configuration types.

use super::defaults::*;
use crate::widgets::PaginationOptions;
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
}

/// Bot configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Bot identity and command syntax.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Display name, also used as the bot's user ID on the console.
    #[serde(default = "default_bot_name")]
    pub name: String,
    /// Command prefix (default: `!`).
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            prefix: default_prefix(),
        }
    }
}

/// Persistent store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Database file path, or `:memory:` for an ephemeral store.
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Paginated listing settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_lines_per_page")]
    pub lines_per_page: usize,
    /// Seconds a listing keeps reacting to page flips.
    #[serde(default = "default_page_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_emoji_left")]
    pub emoji_left: String,
    #[serde(default = "default_emoji_right")]
    pub emoji_right: String,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            lines_per_page: default_lines_per_page(),
            timeout_secs: default_page_timeout_secs(),
            emoji_left: default_emoji_left(),
            emoji_right: default_emoji_right(),
        }
    }
}

impl PaginationConfig {
    pub fn options(&self) -> PaginationOptions {
        PaginationOptions {
            lines_per_page: self.lines_per_page,
            timeout: Duration::from_secs(self.timeout_secs),
            emoji_left: self.emoji_left.clone(),
            emoji_right: self.emoji_right.clone(),
        }
    }
}

/// Prometheus endpoint configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsConfig {
    /// Port for the `/metrics` HTTP endpoint. Disabled when unset.
    pub port: Option<u16>,
}

/// Identity of the local console user.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_console_user_id")]
    pub user_id: String,
    #[serde(default = "default_console_user_name")]
    pub user_name: String,
    /// Roles the console user holds, e.g. `["mod"]`.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Channel name console messages appear to come from.
    #[serde(default = "default_console_channel")]
    pub channel: String,
    #[serde(default)]
    pub guild_id: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            user_id: default_console_user_id(),
            user_name: default_console_user_name(),
            roles: Vec::new(),
            channel: default_console_channel(),
            guild_id: None,
        }
    }
}
