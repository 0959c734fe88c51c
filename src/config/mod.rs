//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions, one per TOML section
//! - [`defaults`]: serde default functions
//! - [`validation`]: startup checks collecting every problem at once

mod defaults;
mod types;
mod validation;

pub use types::{
    BotConfig, Config, ConfigError, ConsoleConfig, MetricsConfig, PaginationConfig, StoreConfig,
};
pub use validation::{ValidationError, validate};
