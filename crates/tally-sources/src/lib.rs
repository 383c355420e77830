//! # tally-sources
//!
//! HTTP clients that feed a tally report:
//! - [`HarvestClient`]: project tasks (with estimates) and time entries
//! - [`GitHubClient`]: all issues of a repository, projected time derived
//!
//! Each client implements the matching source trait from `tally-core`. No
//! retries happen here; any failure surfaces to the report as a whole.

mod error;
mod github;
mod harvest;
mod http;

pub use error::SourceError;
pub use github::GitHubClient;
pub use harvest::HarvestClient;
