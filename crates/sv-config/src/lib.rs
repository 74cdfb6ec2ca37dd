//! # sv-config
//!
//! Layered configuration loading for Surveyor using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SURVEYOR_*` prefix, `__` as separator)
//! 2. Project-level `.surveyor/config.toml`
//! 3. User-level `~/.config/surveyor/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SURVEYOR_CACHE__TTL_SECS` -> `cache.ttl_secs`,
//! `SURVEYOR_QUEUE__MAX_ATTEMPTS` -> `queue.max_attempts`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use sv_config::SurveyorConfig;
//!
//! let config = SurveyorConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod cache;
mod database;
mod error;
mod logging;
mod queue;

pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use logging::LogConfig;
pub use queue::QueueConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SurveyorConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl SurveyorConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so callers can layer extra providers (CLI flags) on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".surveyor/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("SURVEYOR_").split("__"))
    }

    /// Reject values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::invalid("database.path", "must not be empty"));
        }
        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::invalid("cache.ttl_secs", "must be greater than 0"));
        }
        if self.queue.name.trim().is_empty() {
            return Err(ConfigError::invalid("queue.name", "must not be empty"));
        }
        if self.queue.max_attempts == 0 {
            return Err(ConfigError::invalid("queue.max_attempts", "must be at least 1"));
        }
        if self.queue.workers == 0 {
            return Err(ConfigError::invalid("queue.workers", "must be at least 1"));
        }
        if self.queue.base_delay_ms > self.queue.max_delay_ms {
            return Err(ConfigError::invalid(
                "queue.base_delay_ms",
                "must not exceed queue.max_delay_ms",
            ));
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("surveyor").join("config.toml"))
    }
}
