//! GitHub repository configuration.

use serde::{Deserialize, Serialize};
use tally_core::ProjectedTimePattern;

use crate::ConfigError;

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_time_pattern() -> String {
    ProjectedTimePattern::DEFAULT_PATTERN.to_string()
}

const fn default_time_multiplier() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubConfig {
    /// OAuth or personal access token. Requests are anonymous when empty.
    #[serde(default)]
    pub token: String,

    /// Repository owner (user or organization).
    #[serde(default)]
    pub owner: String,

    /// Repository name.
    #[serde(default)]
    pub repository: String,

    /// REST API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Regex whose first capture group holds the projected time in issue titles.
    #[serde(default = "default_time_pattern")]
    pub time_pattern: String,

    /// Factor applied to the captured number (e.g. `8` for days in titles).
    #[serde(default = "default_time_multiplier")]
    pub time_multiplier: f64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            owner: String::new(),
            repository: String::new(),
            api_base: default_api_base(),
            time_pattern: default_time_pattern(),
            time_multiplier: default_time_multiplier(),
        }
    }
}

impl GitHubConfig {
    /// Check if the repository to read issues from is known.
    pub fn is_configured(&self) -> bool {
        !self.owner.is_empty() && !self.repository.is_empty()
    }

    /// Compile the projected-time pattern.
    pub fn projected_time_pattern(&self) -> Result<ProjectedTimePattern, ConfigError> {
        ProjectedTimePattern::new(&self.time_pattern, self.time_multiplier).map_err(|e| {
            ConfigError::InvalidValue {
                field: "github.time_pattern".into(),
                reason: e.to_string(),
            }
        })
    }
}
