//! Entity structs for the three datasets a report reconciles.
//!
//! Entities are plain input records: they are built once by a source and never
//! mutated afterwards. Everything the reconciliation derives (attached time
//! entries, issue links, consumed issues) lives in
//! [`Reconciliation`](crate::reconcile::Reconciliation).

mod issue;
mod task;
mod time_entry;

pub use issue::{Issue, Milestone};
pub use task::Task;
pub use time_entry::TimeEntry;
