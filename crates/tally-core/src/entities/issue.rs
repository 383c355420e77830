use serde::{Deserialize, Serialize};

/// Label that marks an issue as work nobody planned for.
pub const UNPLANNED_LABEL: &str = "unplanned";

/// A GitHub milestone. Only its title is used, as a join key to task names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Milestone {
    pub title: String,
}

/// A GitHub issue with its projected time already derived from the title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub milestone: Option<Milestone>,
    /// Label names.
    pub labels: Vec<String>,
    /// Hours projected by the issue title, after applying the multiplier.
    pub projected_time: Option<f64>,
}

impl Issue {
    /// Title of the issue's milestone, if it has one.
    #[must_use]
    pub fn milestone_title(&self) -> Option<&str> {
        self.milestone.as_ref().map(|m| m.title.as_str())
    }

    /// Whether the issue carries the literal `unplanned` label.
    #[must_use]
    pub fn is_unplanned(&self) -> bool {
        self.labels.iter().any(|label| label == UNPLANNED_LABEL)
    }
}
