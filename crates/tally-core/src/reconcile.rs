//! Reconciliation of tasks, time entries and issues into report rows.
//!
//! The join runs in one pass over borrowed inputs:
//!
//! 1. Every time entry is attached to its task (an unknown task id aborts the
//!    run). A leading `#<number>: ` in the notes links the entry to that issue
//!    and consumes the issue.
//! 2. Tasks emit one row per attached entry, or a single estimate-only row.
//! 3. Issues that were not consumed and whose milestone title names a task emit
//!    one row each.
//!
//! Rows from step 2 always precede rows from step 3 and both keep input order.

use std::collections::HashMap;

use crate::entities::{Issue, Task, TimeEntry};
use crate::errors::ReportError;
use crate::patterns::issue_reference;
use crate::row::{Planned, ReconciledRow};

/// Indices built while attaching time entries. Inputs are only borrowed.
#[derive(Debug)]
pub struct Reconciliation<'a> {
    tasks: &'a [Task],
    entries: &'a [TimeEntry],
    issues: &'a [Issue],
    /// Entry indices attached to each task, in attachment order.
    attachments: Vec<Vec<usize>>,
    /// Issue index linked to each entry.
    links: Vec<Option<usize>>,
    /// Consumed flag per issue index.
    consumed: Vec<bool>,
    issues_by_number: HashMap<u64, usize>,
    tasks_by_name: HashMap<&'a str, usize>,
}

impl<'a> Reconciliation<'a> {
    /// Attach every time entry to its task and link issue references.
    ///
    /// When several tasks share a name, the last one is the milestone join
    /// target. When several issues share a number, the last one is the note
    /// reference target.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::UnknownTaskReference`] for the first time entry
    /// whose task id is not in `tasks`.
    pub fn build(
        tasks: &'a [Task],
        entries: &'a [TimeEntry],
        issues: &'a [Issue],
    ) -> Result<Self, ReportError> {
        let tasks_by_id: HashMap<u64, usize> = tasks
            .iter()
            .enumerate()
            .map(|(index, task)| (task.id, index))
            .collect();
        let tasks_by_name = tasks
            .iter()
            .enumerate()
            .map(|(index, task)| (task.name.as_str(), index))
            .collect();
        let issues_by_number = issues
            .iter()
            .enumerate()
            .map(|(index, issue)| (issue.number, index))
            .collect();

        let mut reconciliation = Self {
            tasks,
            entries,
            issues,
            attachments: vec![Vec::new(); tasks.len()],
            links: vec![None; entries.len()],
            consumed: vec![false; issues.len()],
            issues_by_number,
            tasks_by_name,
        };

        for (entry_index, entry) in entries.iter().enumerate() {
            let task_index = *tasks_by_id.get(&entry.task_id).ok_or(
                ReportError::UnknownTaskReference {
                    entry_id: entry.id,
                    task_id: entry.task_id,
                },
            )?;
            reconciliation.attachments[task_index].push(entry_index);
            reconciliation.link_issue(entry_index, entry);
        }

        Ok(reconciliation)
    }

    fn link_issue(&mut self, entry_index: usize, entry: &TimeEntry) {
        let Some(number) = entry.notes.as_deref().and_then(issue_reference) else {
            return;
        };
        match self.issues_by_number.get(&number) {
            Some(&issue_index) => {
                self.links[entry_index] = Some(issue_index);
                self.consumed[issue_index] = true;
            }
            None => {
                tracing::debug!(entry_id = entry.id, issue = number, "notes reference unknown issue");
            }
        }
    }

    /// Time entries attached to the task at `task_index`, in attachment order.
    pub fn attached(&self, task_index: usize) -> impl Iterator<Item = &'a TimeEntry> + '_ {
        self.attachments
            .get(task_index)
            .into_iter()
            .flatten()
            .map(|&entry_index| &self.entries[entry_index])
    }

    /// Issue linked to the time entry at `entry_index`.
    #[must_use]
    pub fn linked_issue(&self, entry_index: usize) -> Option<&'a Issue> {
        self.links
            .get(entry_index)
            .copied()
            .flatten()
            .map(|issue_index| &self.issues[issue_index])
    }

    /// Whether a time entry referenced the issue with this number.
    #[must_use]
    pub fn is_consumed(&self, number: u64) -> bool {
        self.issues_by_number
            .get(&number)
            .is_some_and(|&issue_index| self.consumed[issue_index])
    }

    /// Emit task-driven rows followed by leftover-issue rows.
    #[must_use]
    pub fn rows(&self) -> Vec<ReconciledRow> {
        let mut rows = Vec::with_capacity(self.entries.len() + self.tasks.len());

        for (task, attached) in self.tasks.iter().zip(&self.attachments) {
            if attached.is_empty() {
                rows.push(ReconciledRow::estimate_only(task.name.clone(), task.estimate));
                continue;
            }
            for &entry_index in attached {
                rows.push(self.entry_row(task, entry_index));
            }
        }

        for (issue_index, issue) in self.issues.iter().enumerate() {
            if self.consumed[issue_index] {
                continue;
            }
            let Some(task) = self.milestone_task(issue) else {
                tracing::debug!(issue = issue.number, "issue has no milestone matching a task");
                continue;
            };
            rows.push(ReconciledRow {
                issue_id: Some(issue.number),
                projected_hours: issue.projected_time,
                planned: Some(Planned::Flag(!issue.is_unplanned())),
                ..ReconciledRow::estimate_only(task.name.clone(), task.estimate)
            });
        }

        rows
    }

    fn entry_row(&self, task: &Task, entry_index: usize) -> ReconciledRow {
        let entry = &self.entries[entry_index];
        let issue = self.linked_issue(entry_index);
        let projected = issue.and_then(|issue| issue.projected_time);

        ReconciledRow {
            task: task.name.clone(),
            estimate: task.estimate,
            date: Some(entry.created_at),
            user_id: Some(entry.user_id),
            hours: Some(entry.hours),
            issue_id: issue.map(|issue| issue.number),
            projected_hours: projected,
            planned: projected.map(Planned::Hours),
        }
    }

    fn milestone_task(&self, issue: &Issue) -> Option<&'a Task> {
        let title = issue.milestone_title()?;
        self.tasks_by_name
            .get(title)
            .map(|&task_index| &self.tasks[task_index])
    }
}

/// Reconcile the three datasets into ordered report rows.
///
/// # Errors
///
/// Returns [`ReportError::UnknownTaskReference`] if a time entry names a task
/// that is not in `tasks`.
pub fn reconcile(
    tasks: &[Task],
    entries: &[TimeEntry],
    issues: &[Issue],
) -> Result<Vec<ReconciledRow>, ReportError> {
    Ok(Reconciliation::build(tasks, entries, issues)?.rows())
}
