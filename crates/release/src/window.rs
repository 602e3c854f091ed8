//! Time bounds admitting closed issues into a changeset.

use crate::model::Issue;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Subtracted from the previous tag's commit date to form the lower bound.
pub const SINCE_SAFETY_MARGIN: Duration = Duration::hours(24);

/// Grace period between a merge event and the commit timestamp it produced.
pub const UNTIL_LENIENCY: Duration = Duration::seconds(2);

/// The `[since, until]` interval used to admit closed issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangesetWindow {
    /// Lower bound; unset means "from the beginning of history"
    pub since: Option<DateTime<Utc>>,
    /// Upper bound, the head commit's author timestamp
    pub until: DateTime<Utc>,
}

impl ChangesetWindow {
    /// Creates a window from already computed bounds.
    #[must_use]
    pub const fn new(since: Option<DateTime<Utc>>, until: DateTime<Utc>) -> Self {
        Self { since, until }
    }
}

/// Applies the safety margin to a previous tag's commit date.
#[must_use]
pub fn since_floor(previous_commit: DateTime<Utc>) -> DateTime<Utc> {
    previous_commit - SINCE_SAFETY_MARGIN
}

/// Keeps issues closed strictly after `since`.
#[must_use]
pub fn closed_after(issues: Vec<Issue>, since: DateTime<Utc>) -> Vec<Issue> {
    issues
        .into_iter()
        .filter(|issue| issue.closed_at.is_some_and(|t| t > since))
        .collect()
}

/// Keeps issues closed strictly before `until` plus [`UNTIL_LENIENCY`].
#[must_use]
pub fn closed_before(issues: Vec<Issue>, until: DateTime<Utc>) -> Vec<Issue> {
    let limit = until + UNTIL_LENIENCY;
    issues
        .into_iter()
        .filter(|issue| issue.closed_at.is_some_and(|t| t < limit))
        .collect()
}
