use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hours logged by one user against one task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeEntry {
    pub id: u64,
    pub task_id: u64,
    pub user_id: u64,
    pub hours: f64,
    pub created_at: DateTime<Utc>,
    /// Free-text notes. A leading `#<number>: ` links the entry to an issue.
    pub notes: Option<String>,
}
