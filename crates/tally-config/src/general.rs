//! General application configuration.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use tally_core::ReportTimeZone;

use crate::ConfigError;

fn default_user_agent() -> String {
    format!("tally/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timezone() -> String {
    "local".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// User agent sent to Harvest and GitHub.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Zone for the year/month/date columns: `local`, `utc` or `+HH:MM`.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timezone: default_timezone(),
        }
    }
}

impl GeneralConfig {
    /// Resolve the configured time zone.
    ///
    /// `local` stays a zone rather than the offset in force today, so each
    /// entry date is placed with its own daylight saving offset.
    pub fn time_zone(&self) -> Result<ReportTimeZone, ConfigError> {
        let value = self.timezone.trim();
        match value.to_ascii_lowercase().as_str() {
            "" | "local" => Ok(ReportTimeZone::Local),
            "utc" | "z" => Ok(ReportTimeZone::Fixed(Utc.fix())),
            _ => value
                .parse::<FixedOffset>()
                .map(ReportTimeZone::Fixed)
                .map_err(|e| ConfigError::InvalidValue {
                    field: "general.timezone".into(),
                    reason: format!("expected 'local', 'utc' or an offset like '+02:00' ({e})"),
                }),
        }
    }
}
