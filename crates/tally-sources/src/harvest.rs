//! Harvest client: project tasks with estimates, and project time entries.
//!
//! Talks to the classic Harvest API with HTTP basic auth. Tasks are the
//! account's task list narrowed to those assigned to the project, each carrying
//! the estimate of its assignment.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tally_config::HarvestConfig;
use tally_core::{Task, TaskSource, TimeEntry, TimeEntrySource};

use crate::error::SourceError;
use crate::http::{check_response, read_json};

const TIMEOUT: Duration = Duration::from_secs(60);

#[derive(serde::Deserialize)]
struct AssignmentEnvelope {
    task_assignment: Assignment,
}

#[derive(serde::Deserialize)]
struct Assignment {
    task_id: u64,
    #[serde(default)]
    estimate: Option<f64>,
}

#[derive(serde::Deserialize)]
struct TaskEnvelope {
    task: TaskRecord,
}

#[derive(serde::Deserialize)]
struct TaskRecord {
    id: u64,
    name: String,
}

#[derive(serde::Deserialize)]
struct DayEntryEnvelope {
    day_entry: DayEntry,
}

#[derive(serde::Deserialize)]
struct DayEntry {
    id: u64,
    task_id: u64,
    user_id: u64,
    hours: f64,
    created_at: DateTime<Utc>,
    #[serde(default)]
    notes: Option<String>,
}

impl From<DayEntry> for TimeEntry {
    fn from(entry: DayEntry) -> Self {
        Self {
            id: entry.id,
            task_id: entry.task_id,
            user_id: entry.user_id,
            hours: entry.hours,
            created_at: entry.created_at,
            notes: entry.notes,
        }
    }
}

/// Keep tasks that have an assignment on the project, in task list order.
fn assigned_tasks(tasks: Vec<TaskEnvelope>, assignments: Vec<AssignmentEnvelope>) -> Vec<Task> {
    let estimates: HashMap<u64, Option<f64>> = assignments
        .into_iter()
        .map(|a| (a.task_assignment.task_id, a.task_assignment.estimate))
        .collect();

    tasks
        .into_iter()
        .filter_map(|envelope| {
            let task = envelope.task;
            estimates.get(&task.id).map(|&estimate| Task {
                id: task.id,
                name: task.name,
                estimate,
            })
        })
        .collect()
}

/// HTTP client for one Harvest project.
#[derive(Clone)]
pub struct HarvestClient {
    http: reqwest::Client,
    base_url: String,
    email: String,
    password: String,
    project_id: u64,
    from: String,
    to: String,
}

impl HarvestClient {
    /// Build a client for the configured account and project.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be built.
    pub fn from_config(config: &HarvestConfig, user_agent: &str) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            email: config.email.clone(),
            password: config.password.clone(),
            project_id: config.project_id,
            from: config.from.clone(),
            to: config.to.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T, SourceError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, "harvest request");

        let resp = self
            .http
            .get(&url)
            .basic_auth(&self.email, Some(&self.password))
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        read_json(check_response(resp).await?, what).await
    }

    /// Fetch the project's tasks with their assignment estimates.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if either request fails or cannot be parsed.
    pub async fn tasks(&self) -> Result<Vec<Task>, SourceError> {
        tracing::debug!(project_id = self.project_id, "getting harvest tasks");

        let assignments: Vec<AssignmentEnvelope> = self
            .get_json(
                &format!("/projects/{}/task_assignments", self.project_id),
                "harvest task assignments",
            )
            .await?;
        let tasks: Vec<TaskEnvelope> = self.get_json("/tasks", "harvest tasks").await?;

        let tasks = assigned_tasks(tasks, assignments);
        tracing::info!(count = tasks.len(), "harvest tasks loaded");
        Ok(tasks)
    }

    /// Fetch the project's time entries within the configured range.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails or cannot be parsed.
    pub async fn time_entries(&self) -> Result<Vec<TimeEntry>, SourceError> {
        tracing::debug!(project_id = self.project_id, from = %self.from, to = %self.to, "getting harvest time entries");

        let path = format!(
            "/projects/{}/entries?from={}&to={}",
            self.project_id,
            urlencoding::encode(&self.from),
            urlencoding::encode(&self.to)
        );
        let entries: Vec<DayEntryEnvelope> = self.get_json(&path, "harvest time entries").await?;

        let entries: Vec<TimeEntry> = entries.into_iter().map(|e| e.day_entry.into()).collect();
        tracing::info!(count = entries.len(), "harvest time entries loaded");
        Ok(entries)
    }
}

impl TaskSource for HarvestClient {
    type Error = SourceError;

    async fn fetch_tasks(&self) -> Result<Vec<Task>, SourceError> {
        self.tasks().await
    }
}

impl TimeEntrySource for HarvestClient {
    type Error = SourceError;

    async fn fetch_time_entries(&self) -> Result<Vec<TimeEntry>, SourceError> {
        self.time_entries().await
    }
}
