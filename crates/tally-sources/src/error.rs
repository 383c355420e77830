//! Source error types.

use thiserror::Error;

/// Errors that can occur while fetching a dataset from Harvest or GitHub.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the API.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Failed to parse an API response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The API returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// The client could not be built from configuration.
    #[error(transparent)]
    Config(#[from] tally_config::ConfigError),
}
