//! Identity filters narrowing the candidate issue set.
//!
//! Every filter returns a subset of its input in input order; none of
//! them ever adds an issue.

use crate::error::Result;
use crate::host::HostClient;
use crate::model::{Comparison, Issue, PullRequest, RepoSlug};
use crate::xref::{closing_reference, merge_reference};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::HashSet;
use tracing::debug;

/// Removes issues that a candidate pull request closes through its body.
///
/// When a pull request says `Fixes #12`, both it and issue #12 show up as
/// closed; only the pull request is kept.
#[must_use]
pub fn drop_closed_by_pull(issues: Vec<Issue>) -> Vec<Issue> {
    let closed_by_pull: HashSet<u64> = issues
        .iter()
        .filter(|issue| issue.is_pull_request())
        .filter_map(|pull| closing_reference(&pull.body))
        .collect();

    retain_numbers(issues, |number| !closed_by_pull.contains(&number))
}

/// Removes pull requests that were closed without being merged.
///
/// Merge status is fetched for every candidate pull request, at most
/// `concurrency` requests at a time.
///
/// # Errors
///
/// Any failed lookup aborts the filter; an item whose merge status is unknown
/// cannot be classified.
pub async fn drop_unmerged_pulls<H>(
    issues: Vec<Issue>,
    host: &H,
    repo: &RepoSlug,
    concurrency: usize,
) -> Result<Vec<Issue>>
where
    H: HostClient + ?Sized,
{
    let pulls: Vec<u64> = issues
        .iter()
        .filter(|issue| issue.is_pull_request())
        .map(|pull| pull.number)
        .collect();

    if pulls.is_empty() {
        return Ok(issues);
    }

    debug!(count = pulls.len(), concurrency, "Fetching pull request merge status");

    let statuses: Vec<PullRequest> = stream::iter(pulls)
        .map(|number| host.get_pull_request(repo, number))
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    let unmerged: HashSet<u64> = statuses
        .iter()
        .filter(|pull| !pull.merged)
        .map(PullRequest::number)
        .collect();

    Ok(retain_numbers(issues, |number| !unmerged.contains(&number)))
}

/// Keeps pull requests and the issues some commit in range closes.
#[must_use]
pub fn require_commit_evidence(issues: Vec<Issue>, comparison: &Comparison) -> Vec<Issue> {
    let closed_by_commit: HashSet<u64> = comparison.messages().filter_map(closing_reference).collect();

    issues
        .into_iter()
        .filter(|issue| issue.is_pull_request() || closed_by_commit.contains(&issue.number))
        .collect()
}

/// Keeps plain issues and the pull requests merged by a commit in range.
///
/// A pull request merged into another branch, or after the head revision,
/// is still globally closed inside the time window; this drops it.
#[must_use]
pub fn require_merged_in_range(issues: Vec<Issue>, comparison: &Comparison) -> Vec<Issue> {
    let merged_in_range: HashSet<u64> = comparison.messages().filter_map(merge_reference).collect();

    issues
        .into_iter()
        .filter(|issue| !issue.is_pull_request() || merged_in_range.contains(&issue.number))
        .collect()
}

fn retain_numbers(issues: Vec<Issue>, keep: impl Fn(u64) -> bool) -> Vec<Issue> {
    issues.into_iter().filter(|issue| keep(issue.number)).collect()
}
