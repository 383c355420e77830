//! Heuristic text patterns used to join the datasets.
//!
//! Both joins that go through free text live here as pure functions:
//! - [`issue_reference`]: time entry notes → issue number
//! - [`ProjectedTimePattern::projected_time`]: issue title → projected hours

use std::sync::LazyLock;

use regex::Regex;

use crate::entities::{Issue, Milestone};
use crate::errors::PatternError;

/// `#<digits>:` followed by whitespace, at the very start of the notes.
static ISSUE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#([0-9]+):\s").expect("issue reference regex is valid"));

/// Leading decimal number, the way a lenient float parse reads a prefix.
static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
        .expect("leading number regex is valid")
});

/// Extract the issue number referenced at the start of time entry notes.
///
/// `"#42: fixed bug"` yields `Some(42)`. References anywhere else in the text,
/// a missing colon, or a colon not followed by whitespace yield `None`.
#[must_use]
pub fn issue_reference(notes: &str) -> Option<u64> {
    ISSUE_REFERENCE
        .captures(notes)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Parse the leading number of `text`, ignoring whatever follows it.
fn parse_leading_number(text: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(text)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
}

/// Configured pattern that derives projected hours from an issue title.
///
/// The first capture group of the first match is read as a number and
/// multiplied by `multiplier` (for example `0.5` when titles carry half-days).
#[derive(Debug, Clone)]
pub struct ProjectedTimePattern {
    regex: Regex,
    multiplier: f64,
}

impl ProjectedTimePattern {
    /// Default pattern: a parenthesised hour count such as `(3.5h)`.
    pub const DEFAULT_PATTERN: &'static str = r"\(([0-9]+(?:\.[0-9]+)?)h\)";

    /// Compile a projected-time pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the regex does not compile, has no capture
    /// group, or the multiplier is not finite.
    pub fn new(pattern: &str, multiplier: f64) -> Result<Self, PatternError> {
        let regex = Regex::new(pattern)?;
        if regex.captures_len() < 2 {
            return Err(PatternError::MissingCaptureGroup(pattern.to_string()));
        }
        if !multiplier.is_finite() {
            return Err(PatternError::InvalidMultiplier(multiplier));
        }
        Ok(Self { regex, multiplier })
    }

    #[must_use]
    pub const fn multiplier(&self) -> f64 {
        self.multiplier
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Projected hours for `title`, or `None` when the title carries none.
    #[must_use]
    pub fn projected_time(&self, title: &str) -> Option<f64> {
        let caps = self.regex.captures(title)?;
        let group = caps.get(1).filter(|m| !m.as_str().is_empty())?;
        parse_leading_number(group.as_str()).map(|hours| hours * self.multiplier)
    }

    /// Build an [`Issue`] whose projected time is derived from its title.
    #[must_use]
    pub fn issue(
        &self,
        number: u64,
        title: String,
        milestone: Option<Milestone>,
        labels: Vec<String>,
    ) -> Issue {
        let projected_time = self.projected_time(&title);
        Issue {
            number,
            title,
            milestone,
            labels,
            projected_time,
        }
    }
}

impl Default for ProjectedTimePattern {
    fn default() -> Self {
        Self {
            regex: Regex::new(Self::DEFAULT_PATTERN).expect("default projected time regex is valid"),
            multiplier: 1.0,
        }
    }
}
