//! Report driver: fetch, reconcile, render.
//!
//! The three datasets are fetched concurrently and joined before anything else
//! happens. If any fetch fails the whole report fails; nothing is rendered from
//! partial data.

use std::future::Future;

use crate::entities::{Issue, Task, TimeEntry};
use crate::errors::{Dataset, ReportError};
use crate::reconcile::reconcile;
use crate::row::{ReportTimeZone, format_header, format_row};

/// Source of the tasks assigned to the reported project, estimates included.
pub trait TaskSource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch_tasks(&self) -> impl Future<Output = Result<Vec<Task>, Self::Error>> + Send;
}

/// Source of the time entries logged on the reported project.
pub trait TimeEntrySource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch_time_entries(&self)
    -> impl Future<Output = Result<Vec<TimeEntry>, Self::Error>> + Send;
}

/// Source of every issue in the repository, projected time precomputed.
pub trait IssueSource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch_issues(&self) -> impl Future<Output = Result<Vec<Issue>, Self::Error>> + Send;
}

/// A report over one task source, one time entry source and one issue source.
pub struct Report<T, E, I> {
    tasks: T,
    entries: E,
    issues: I,
    time_zone: ReportTimeZone,
}

impl<T, E, I> Report<T, E, I>
where
    T: TaskSource,
    E: TimeEntrySource,
    I: IssueSource,
{
    /// Create a report that renders dates in the machine's local time zone.
    pub fn new(tasks: T, entries: E, issues: I) -> Self {
        Self {
            tasks,
            entries,
            issues,
            time_zone: ReportTimeZone::Local,
        }
    }

    /// Render entry dates in `time_zone` instead of the local time zone.
    #[must_use]
    pub fn with_time_zone(mut self, time_zone: impl Into<ReportTimeZone>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    /// Fetch all datasets and build the report lines, header first.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Fetch`] if any source fails and
    /// [`ReportError::UnknownTaskReference`] if a time entry names a task the
    /// task source did not return.
    pub async fn generate(&self) -> Result<Vec<String>, ReportError> {
        tracing::info!("loading data");

        let (tasks, entries, issues) = tokio::try_join!(
            async {
                self.tasks
                    .fetch_tasks()
                    .await
                    .map_err(ReportError::fetch(Dataset::Tasks))
            },
            async {
                self.entries
                    .fetch_time_entries()
                    .await
                    .map_err(ReportError::fetch(Dataset::TimeEntries))
            },
            async {
                self.issues
                    .fetch_issues()
                    .await
                    .map_err(ReportError::fetch(Dataset::Issues))
            },
        )?;

        tracing::info!(
            tasks = tasks.len(),
            time_entries = entries.len(),
            issues = issues.len(),
            "data loaded, generating report"
        );

        let rows = reconcile(&tasks, &entries, &issues)?;

        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(format_header());
        lines.extend(rows.iter().map(|row| format_row(row, self.time_zone)));

        tracing::info!(rows = rows.len(), "report created");
        Ok(lines)
    }

    /// Fetch, reconcile and join the report into newline-separated text.
    ///
    /// # Errors
    ///
    /// See [`Report::generate`].
    pub async fn render(&self) -> Result<String, ReportError> {
        Ok(self.generate().await?.join("\n"))
    }
}
