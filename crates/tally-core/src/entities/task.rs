use serde::{Deserialize, Serialize};

/// A billable Harvest task assigned to the reported project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: u64,
    /// Task name. Also the join key for GitHub milestone titles.
    pub name: String,
    /// Estimated hours from the project's task assignment.
    pub estimate: Option<f64>,
}
