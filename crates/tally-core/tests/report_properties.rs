//! End-to-end properties of report generation over in-memory sources.

use std::sync::Arc;
use std::time::Duration;

use chrono::{FixedOffset, TimeZone, Utc};
use pretty_assertions::assert_eq;
use tally_core::{
    Dataset, Issue, IssueSource, Milestone, Report, ReportError, Task, TaskSource, TimeEntry,
    TimeEntrySource, reconcile,
};
use tokio::sync::Barrier;

#[derive(Debug, thiserror::Error)]
#[error("source unavailable")]
struct Unavailable;

/// In-memory source. When a barrier is set, every fetch waits on it first.
struct Memory<V> {
    items: Option<Vec<V>>,
    barrier: Option<Arc<Barrier>>,
}

impl<V: Clone + Send + Sync> Memory<V> {
    fn of(items: Vec<V>) -> Self {
        Self {
            items: Some(items),
            barrier: None,
        }
    }

    fn failing() -> Self {
        Self {
            items: None,
            barrier: None,
        }
    }

    fn gated(mut self, barrier: &Arc<Barrier>) -> Self {
        self.barrier = Some(Arc::clone(barrier));
        self
    }

    async fn load(&self) -> Result<Vec<V>, Unavailable> {
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        self.items.clone().ok_or(Unavailable)
    }
}

impl TaskSource for Memory<Task> {
    type Error = Unavailable;

    async fn fetch_tasks(&self) -> Result<Vec<Task>, Unavailable> {
        self.load().await
    }
}

impl TimeEntrySource for Memory<TimeEntry> {
    type Error = Unavailable;

    async fn fetch_time_entries(&self) -> Result<Vec<TimeEntry>, Unavailable> {
        self.load().await
    }
}

impl IssueSource for Memory<Issue> {
    type Error = Unavailable;

    async fn fetch_issues(&self) -> Result<Vec<Issue>, Unavailable> {
        self.load().await
    }
}

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn task(id: u64, name: &str, estimate: Option<f64>) -> Task {
    Task {
        id,
        name: name.into(),
        estimate,
    }
}

fn entry(id: u64, task_id: u64, day: u32, notes: Option<&str>) -> TimeEntry {
    TimeEntry {
        id,
        task_id,
        user_id: 3,
        hours: 1.5,
        created_at: Utc.with_ymd_and_hms(2016, 6, day, 10, 0, 0).unwrap(),
        notes: notes.map(Into::into),
    }
}

fn issue(number: u64, milestone: Option<&str>, labels: &[&str], projected: Option<f64>) -> Issue {
    Issue {
        number,
        title: format!("Issue {number}"),
        milestone: milestone.map(|title| Milestone {
            title: title.into(),
        }),
        labels: labels.iter().map(ToString::to_string).collect(),
        projected_time: projected,
    }
}

fn sample() -> (Vec<Task>, Vec<TimeEntry>, Vec<Issue>) {
    let tasks = vec![
        task(1, "Build API", Some(40.0)),
        task(2, "Sprint 3", Some(10.0)),
        task(3, "Design", None),
    ];
    let entries = vec![
        entry(100, 3, 1, Some("#42: fixed bug")),
        entry(101, 3, 2, Some("pairing on #7")),
        entry(102, 2, 3, Some("#404: missing issue")),
    ];
    let issues = vec![
        issue(42, Some("Design"), &[], Some(3.5)),
        issue(7, Some("Sprint 3"), &["unplanned"], Some(2.0)),
        issue(8, Some("Sprint 3"), &[], None),
        issue(9, Some("Unknown milestone"), &[], Some(1.0)),
        issue(10, None, &[], Some(1.0)),
    ];
    (tasks, entries, issues)
}

fn report(
    (tasks, entries, issues): (Vec<Task>, Vec<TimeEntry>, Vec<Issue>),
) -> Report<Memory<Task>, Memory<TimeEntry>, Memory<Issue>> {
    Report::new(Memory::of(tasks), Memory::of(entries), Memory::of(issues)).with_time_zone(utc())
}

#[tokio::test]
async fn sample_report_matches_expected_lines() {
    let lines = report(sample()).generate().await.unwrap();

    assert_eq!(
        lines,
        vec![
            r#""task", "estimate", "userId", "hours", "issueId", "projectedHours", "planned", "year", "month", "date""#,
            r#""Build API", "40", "", "", "", "", "", "", "", """#,
            r#""Sprint 3", "10", "3", "1.5", "", "", "", "2016", "6", "3""#,
            r#""Design", "", "3", "1.5", "42", "3.5", "3.5", "2016", "6", "1""#,
            r#""Design", "", "3", "1.5", "", "", "", "2016", "6", "2""#,
            r#""Sprint 3", "10", "", "", "7", "2", "false", "", "", """#,
            r#""Sprint 3", "10", "", "", "8", "", "true", "", "", """#,
        ]
    );
}

#[test]
fn row_count_matches_attachments_plus_leftover_issues() {
    let (tasks, entries, issues) = sample();
    let rows = reconcile(&tasks, &entries, &issues).unwrap();

    let task_rows: usize = tasks
        .iter()
        .map(|t| entries.iter().filter(|e| e.task_id == t.id).count().max(1))
        .sum();
    let leftover_rows = 2;
    assert_eq!(rows.len(), task_rows + leftover_rows);
}

#[test]
fn every_known_entry_appears_in_exactly_one_row() {
    let (tasks, entries, issues) = sample();
    let rows = reconcile(&tasks, &entries, &issues).unwrap();

    for entry in &entries {
        let matching = rows
            .iter()
            .filter(|row| row.date == Some(entry.created_at))
            .count();
        assert_eq!(matching, 1, "entry {} should appear once", entry.id);
    }
}

#[tokio::test]
async fn unknown_task_produces_no_output() {
    let (tasks, mut entries, issues) = sample();
    entries.push(entry(999, 77, 4, None));

    let err = report((tasks, entries, issues)).render().await.unwrap_err();
    assert!(matches!(
        err,
        ReportError::UnknownTaskReference {
            entry_id: 999,
            task_id: 77
        }
    ));
}

#[tokio::test]
async fn any_failing_source_aborts_the_report() {
    let (tasks, entries, issues) = sample();

    let err = Report::new(
        Memory::<Task>::failing(),
        Memory::of(entries.clone()),
        Memory::of(issues.clone()),
    )
    .generate()
    .await
    .unwrap_err();
    assert!(matches!(err, ReportError::Fetch { dataset: Dataset::Tasks, .. }));

    let err = Report::new(
        Memory::of(tasks),
        Memory::<TimeEntry>::failing(),
        Memory::of(issues),
    )
    .generate()
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        ReportError::Fetch {
            dataset: Dataset::TimeEntries,
            ..
        }
    ));
}

#[tokio::test]
async fn generation_is_idempotent() {
    let first = report(sample()).render().await.unwrap();
    let second = report(sample()).render().await.unwrap();
    assert_eq!(first, second);

    let same_report = report(sample());
    assert_eq!(
        same_report.render().await.unwrap(),
        same_report.render().await.unwrap()
    );
}

#[tokio::test(flavor = "current_thread")]
async fn fetches_run_concurrently_on_one_thread() {
    let (tasks, entries, issues) = sample();
    let barrier = Arc::new(Barrier::new(3));

    let report = Report::new(
        Memory::of(tasks).gated(&barrier),
        Memory::of(entries).gated(&barrier),
        Memory::of(issues).gated(&barrier),
    )
    .with_time_zone(utc());

    let lines = tokio::time::timeout(Duration::from_secs(5), report.generate())
        .await
        .expect("all three fetches must be in flight at the same time")
        .unwrap();
    assert_eq!(lines.len(), 7);
}

#[tokio::test]
async fn task_without_time_yields_sentinel_line() {
    let lines = report((vec![task(1, "Build API", Some(40.0))], Vec::new(), Vec::new()))
        .generate()
        .await
        .unwrap();
    assert_eq!(lines[1], r#""Build API", "40", "", "", "", "", "", "", "", """#);
}
