//! # tally-config
//!
//! Layered configuration loading for tally using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TALLY_*` prefix, `__` as separator)
//! 2. Project-level `.tally/config.toml`
//! 3. User-level `~/.config/tally/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TALLY_HARVEST__PROJECT_ID` -> `harvest.project_id`,
//! `TALLY_GITHUB__TOKEN` -> `github.token`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use tally_config::TallyConfig;
//!
//! let config = TallyConfig::load_with_dotenv().expect("config");
//! config.require_configured().expect("harvest and github are set up");
//! println!("reporting Harvest project {}", config.harvest.project_id);
//! ```

mod error;
mod general;
mod github;
mod harvest;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use github::GitHubConfig;
pub use harvest::HarvestConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder shown instead of secrets.
const REDACTED: &str = "********";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub harvest: HarvestConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl TallyConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`TallyConfig::load_with_dotenv`] for `.env` support.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration after reading `.env` from the current directory.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so callers can merge further providers (e.g. CLI flags) on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".tally/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("TALLY_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tally").join("config.toml"))
    }

    /// Fail fast unless both services are configured and every value is usable.
    pub fn require_configured(&self) -> Result<(), ConfigError> {
        if !self.harvest.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "harvest".into(),
            });
        }
        if !self.github.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "github".into(),
            });
        }
        self.harvest.validate()?;
        self.github.projected_time_pattern()?;
        self.general.time_zone()?;
        Ok(())
    }

    /// Copy of the config with passwords and tokens masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        for secret in [&mut config.harvest.password, &mut config.github.token] {
            if !secret.is_empty() {
                *secret = REDACTED.to_string();
            }
        }
        config
    }
}
