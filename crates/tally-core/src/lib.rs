//! # tally-core
//!
//! Reconciliation of Harvest tasks, Harvest time entries and GitHub issues into
//! a single estimate-versus-actual report.
//!
//! This crate provides everything that is independent of the remote services:
//! - Entity structs for tasks, time entries, issues and milestones
//! - Heuristic text patterns (issue references in notes, projected time in titles)
//! - The reconciliation engine that joins the three datasets
//! - The fixed-column row formatter
//! - The report driver and the source traits it fetches through
//! - Cross-cutting error types

pub mod entities;
pub mod errors;
pub mod patterns;
pub mod reconcile;
pub mod report;
pub mod row;

pub use entities::{Issue, Milestone, Task, TimeEntry};
pub use errors::{Dataset, PatternError, ReportError};
pub use patterns::{ProjectedTimePattern, issue_reference};
pub use reconcile::{Reconciliation, reconcile};
pub use report::{IssueSource, Report, TaskSource, TimeEntrySource};
pub use row::{HEADER, Planned, ReconciledRow, ReportTimeZone, format_header, format_row};
