//! GitHub client: every issue of one repository, across all pages.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use tally_config::GitHubConfig;
use tally_core::{Issue, IssueSource, Milestone, ProjectedTimePattern};

use crate::error::SourceError;
use crate::http::{check_response, has_next_page, read_json};

const TIMEOUT: Duration = Duration::from_secs(60);
const PER_PAGE: u32 = 100;

#[derive(serde::Deserialize)]
struct IssueRecord {
    number: u64,
    title: String,
    #[serde(default)]
    milestone: Option<MilestoneRecord>,
    #[serde(default)]
    labels: Vec<LabelRecord>,
}

#[derive(serde::Deserialize)]
struct MilestoneRecord {
    title: String,
}

#[derive(serde::Deserialize)]
struct LabelRecord {
    name: String,
}

impl IssueRecord {
    fn normalize(self, pattern: &ProjectedTimePattern) -> Issue {
        pattern.issue(
            self.number,
            self.title,
            self.milestone.map(|m| Milestone { title: m.title }),
            self.labels.into_iter().map(|l| l.name).collect(),
        )
    }
}

/// HTTP client for the issues of one GitHub repository.
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    owner: String,
    repository: String,
    token: String,
    pattern: ProjectedTimePattern,
}

impl GitHubClient {
    /// Build a client for the configured repository.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the projected-time pattern is
    /// invalid and [`SourceError::Http`] if the `reqwest::Client` cannot be
    /// built.
    pub fn from_config(config: &GitHubConfig, user_agent: &str) -> Result<Self, SourceError> {
        let pattern = config.projected_time_pattern()?;
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repository: config.repository.clone(),
            token: config.token.clone(),
            pattern,
        })
    }

    fn page_url(&self, page: u32) -> String {
        format!(
            "{}/repos/{}/{}/issues?state=all&page={page}&per_page={PER_PAGE}",
            self.api_base,
            urlencoding::encode(&self.owner),
            urlencoding::encode(&self.repository)
        )
    }

    /// Fetch one page. Returns its issues and whether another page follows.
    async fn page(&self, page: u32) -> Result<(Vec<IssueRecord>, bool), SourceError> {
        let mut request = self
            .http
            .get(self.page_url(page))
            .header(ACCEPT, "application/vnd.github.v3+json");
        if !self.token.is_empty() {
            request = request.header(AUTHORIZATION, format!("token {}", self.token));
        }

        let resp = check_response(request.send().await?).await?;
        let more = has_next_page(resp.headers());
        let records = read_json(resp, "github issues").await?;
        Ok((records, more))
    }

    /// Fetch all issues (open and closed), following pagination in order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if any page fails; earlier pages are discarded.
    pub async fn issues(&self) -> Result<Vec<Issue>, SourceError> {
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            tracing::debug!(page, owner = %self.owner, repository = %self.repository, "getting github issues page");
            let (batch, more) = self.page(page).await?;
            records.extend(batch);
            if !more {
                break;
            }
            page += 1;
        }

        let issues: Vec<Issue> = records
            .into_iter()
            .map(|record| record.normalize(&self.pattern))
            .collect();
        tracing::info!(count = issues.len(), pages = page, "github issues loaded");
        Ok(issues)
    }
}

impl IssueSource for GitHubClient {
    type Error = SourceError;

    async fn fetch_issues(&self) -> Result<Vec<Issue>, SourceError> {
        self.issues().await
    }
}
