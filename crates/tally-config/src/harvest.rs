//! Harvest account and project configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Date format Harvest expects for report ranges.
const DATE_FORMAT: &str = "%Y%m%d";

fn default_from() -> String {
    "20000101".to_string()
}

fn default_to() -> String {
    "20990101".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HarvestConfig {
    /// Account subdomain (`{subdomain}.harvestapp.com`).
    #[serde(default)]
    pub subdomain: String,

    /// Login email for HTTP basic auth.
    #[serde(default)]
    pub email: String,

    /// Login password for HTTP basic auth.
    #[serde(default)]
    pub password: String,

    /// Project whose tasks and time entries are reported.
    #[serde(default)]
    pub project_id: u64,

    /// First day of the reported range, `YYYYMMDD`.
    #[serde(default = "default_from")]
    pub from: String,

    /// Last day of the reported range, `YYYYMMDD`.
    #[serde(default = "default_to")]
    pub to: String,

    /// Override for the API base URL. Derived from `subdomain` when empty.
    #[serde(default)]
    pub base_url: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            subdomain: String::new(),
            email: String::new(),
            password: String::new(),
            project_id: 0,
            from: default_from(),
            to: default_to(),
            base_url: String::new(),
        }
    }
}

impl HarvestConfig {
    /// Check if the Harvest config has everything needed to fetch a project.
    pub fn is_configured(&self) -> bool {
        (!self.subdomain.is_empty() || !self.base_url.is_empty())
            && !self.email.is_empty()
            && !self.password.is_empty()
            && self.project_id != 0
    }

    /// API base URL without a trailing slash.
    pub fn base_url(&self) -> String {
        if self.base_url.is_empty() {
            format!("https://{}.harvestapp.com", self.subdomain)
        } else {
            self.base_url.trim_end_matches('/').to_string()
        }
    }

    /// Validate the report range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let from = parse_day("harvest.from", &self.from)?;
        let to = parse_day("harvest.to", &self.to)?;
        if from > to {
            return Err(ConfigError::InvalidValue {
                field: "harvest.from".into(),
                reason: format!("{} is after harvest.to {}", self.from, self.to),
            });
        }
        Ok(())
    }
}

fn parse_day(field: &str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| ConfigError::InvalidValue {
        field: field.into(),
        reason: format!("expected YYYYMMDD, got '{value}' ({e})"),
    })
}
