//! Reconciled rows and their fixed-column text rendering.
//!
//! Every rendered line has exactly ten quoted columns joined by `", "`:
//!
//! ```text
//! task, estimate, userId, hours, issueId, projectedHours, planned, year, month, date
//! ```
//!
//! Absent values render as `""`. The entry date expands into the last three
//! columns; an absent date expands into three `""`.

use std::fmt::{self, Display};

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, Utc};

/// Display names of the report columns, in output order.
pub const HEADER: [&str; 10] = [
    "task",
    "estimate",
    "userId",
    "hours",
    "issueId",
    "projectedHours",
    "planned",
    "year",
    "month",
    "date",
];

const SEPARATOR: &str = ", ";

/// Time zone the year, month and date columns are computed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportTimeZone {
    /// The machine's zone. Each date gets the offset in force on that date,
    /// so entries on either side of a DST change keep their own calendar day.
    #[default]
    Local,
    /// One offset for every date.
    Fixed(FixedOffset),
}

impl ReportTimeZone {
    /// Calendar day of `date` in this zone.
    #[must_use]
    pub fn calendar_date(self, date: &DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Local => date.with_timezone(&Local).date_naive(),
            Self::Fixed(offset) => date.with_timezone(&offset).date_naive(),
        }
    }
}

impl From<FixedOffset> for ReportTimeZone {
    fn from(offset: FixedOffset) -> Self {
        Self::Fixed(offset)
    }
}

/// Value of the `planned` column.
///
/// Rows driven by a time entry carry the linked issue's projected hours; rows
/// for leftover issues carry whether the issue was planned at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Planned {
    Hours(f64),
    Flag(bool),
}

impl Display for Planned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hours(hours) => Display::fmt(hours, f),
            Self::Flag(flag) => Display::fmt(flag, f),
        }
    }
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledRow {
    pub task: String,
    pub estimate: Option<f64>,
    pub date: Option<DateTime<Utc>>,
    pub user_id: Option<u64>,
    pub hours: Option<f64>,
    pub issue_id: Option<u64>,
    pub projected_hours: Option<f64>,
    pub planned: Option<Planned>,
}

impl ReconciledRow {
    /// Row for a task nothing was logged against: name and estimate only.
    #[must_use]
    pub const fn estimate_only(task: String, estimate: Option<f64>) -> Self {
        Self {
            task,
            estimate,
            date: None,
            user_id: None,
            hours: None,
            issue_id: None,
            projected_hours: None,
            planned: None,
        }
    }
}

fn quoted<T: Display>(value: T) -> String {
    format!("\"{value}\"")
}

fn cell<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| quoted(""), quoted)
}

/// Render the header line.
#[must_use]
pub fn format_header() -> String {
    HEADER.map(quoted).join(SEPARATOR)
}

/// Render one row. Date components are taken in `time_zone`.
#[must_use]
pub fn format_row(row: &ReconciledRow, time_zone: ReportTimeZone) -> String {
    let local = row.date.map(|date| time_zone.calendar_date(&date));

    let columns = [
        quoted(&row.task),
        cell(row.estimate),
        cell(row.user_id),
        cell(row.hours),
        cell(row.issue_id),
        cell(row.projected_hours),
        cell(row.planned),
        cell(local.map(|d| d.year())),
        cell(local.map(|d| d.month())),
        cell(local.map(|d| d.day())),
    ];
    columns.join(SEPARATOR)
}
