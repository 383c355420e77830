//! Cross-cutting error types for tally.
//!
//! Errors raised while talking to Harvest or GitHub are defined in
//! `tally-sources`; they reach this crate boxed inside [`ReportError::Fetch`].
//! A unified `anyhow` chain is deferred to `tally-cli`.

use std::fmt;

use thiserror::Error;

/// The three datasets a report is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Tasks,
    TimeEntries,
    Issues,
}

impl Dataset {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::TimeEntries => "time entries",
            Self::Issues => "issues",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that abort a report run. No partial report is ever produced.
#[derive(Debug, Error)]
pub enum ReportError {
    /// One of the three input fetches failed.
    #[error("failed to fetch {dataset}")]
    Fetch {
        dataset: Dataset,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A time entry points at a task that is not part of the task set.
    #[error("Unknown task: time entry {entry_id} references task {task_id}")]
    UnknownTaskReference { entry_id: u64, task_id: u64 },
}

impl ReportError {
    pub(crate) fn fetch<E>(dataset: Dataset) -> impl FnOnce(E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        move |error| Self::Fetch {
            dataset,
            source: Box::new(error),
        }
    }
}

/// A configured text pattern could not be used.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    /// The projected-time pattern must capture the number it matches.
    #[error("pattern '{0}' has no capture group")]
    MissingCaptureGroup(String),

    #[error("multiplier must be a finite number, got {0}")]
    InvalidMultiplier(f64),
}
