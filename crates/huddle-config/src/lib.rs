//! # huddle-config
//!
//! Layered configuration loading for Huddle using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`HUDDLE_*` prefix, `__` as separator)
//! 2. Project-level `.huddle/config.toml`
//! 3. User-level `~/.config/huddle/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `HUDDLE_NOTIFY__QUEUE_CAPACITY` -> `notify.queue_capacity`,
//! etc. The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use huddle_config::HuddleConfig;
//!
//! let config = HuddleConfig::load().expect("config");
//! println!("watched kinds: {:?}", config.notify.activity_kinds);
//! ```

mod error;
mod notify;

pub use error::ConfigError;
pub use notify::NotifyConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HuddleConfig {
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl HuddleConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables (`HUDDLE_*` prefix)
    /// 2. `.huddle/config.toml` (project-local)
    /// 3. `~/.config/huddle/config.toml` (user-global)
    /// 4. Default values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a TOML file is malformed or a value cannot be
    /// deserialized into the config shape.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".huddle/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("HUDDLE_").split("__"));

        figment
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("huddle").join("config.toml"))
    }
}
