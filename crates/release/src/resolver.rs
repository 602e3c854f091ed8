//! Changeset resolution.
//!
//! The resolver loads closed issues, the release tags and the commit range
//! from the host, then narrows the candidates through a fixed pipeline:
//!
//! ```text
//! closed since floor
//!   -> closed after since        (only with a previous tag)
//!   -> closed before until
//!   -> drop closed-by-pull
//!   -> drop unmerged pulls
//!   -> require commit evidence   (only with commits in range)
//!   -> require merged in range   (only with commits in range)
//! ```
//!
//! Without a previous tag (or when it equals the release tag) the range
//! starts at the first commit and the time window is unbounded below.

use crate::config::ReleaseConfig;
use crate::error::Result;
use crate::filters;
use crate::host::HostClient;
use crate::model::{Comparison, Issue};
use crate::window::{self, ChangesetWindow};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// The resolved content of a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changeset {
    /// Time bounds the issues were admitted with
    pub window: ChangesetWindow,
    /// Revision the comparison started from
    pub base: String,
    /// Release-worthy issues and pull requests, in host-reported order
    pub issues: Vec<Issue>,
    /// Watched paths changed in the range, in caller order
    pub changed_files: Vec<String>,
    /// Browsable URL of the comparison
    pub comparison_url: String,
}

/// Resolves which issues and pull requests belong to a release.
pub struct ChangesetResolver<'a, H: ?Sized> {
    host: &'a H,
    config: &'a ReleaseConfig,
}

impl<'a, H> ChangesetResolver<'a, H>
where
    H: HostClient + ?Sized,
{
    /// Creates a resolver for the given configuration.
    #[must_use]
    pub const fn new(host: &'a H, config: &'a ReleaseConfig) -> Self {
        Self { host, config }
    }

    /// Loads everything from the host and runs the pipeline.
    ///
    /// # Errors
    ///
    /// Returns a configuration error before any host call when the
    /// configuration is invalid, and propagates the first host failure.
    pub async fn resolve(&self) -> Result<Changeset> {
        self.config.validate()?;

        let repo = &self.config.repo;
        let next = self.config.next.as_str();

        let (base, since) = if let Some(previous) = self.config.previous_tag() {
            debug!(tag = %previous, "Fetching commit for previous tag");
            let commit = self.host.resolve_tag_to_commit(repo, previous).await?;
            (
                previous.to_string(),
                Some(window::since_floor(commit.authored_at)),
            )
        } else {
            debug!("Fetching first commit");
            let commit = self.host.first_commit(repo).await?;
            (commit.short_sha().to_string(), None)
        };

        debug!(since = ?since, "Fetching closed issues");
        let candidates = self.host.list_closed_issues_since(repo, since).await?;

        debug!(tag = %next, "Fetching commit for release tag");
        let head = self.host.resolve_tag_to_commit(repo, next).await?;
        let window = ChangesetWindow::new(since, head.authored_at);

        debug!(base = %base, head = %next, "Fetching commit comparison");
        let comparison = self.host.compare(repo, &base, next).await?;

        let issues = self.filter(candidates, &window, &comparison).await?;
        let changed_files = watched_changes(&self.config.watched, &comparison);

        info!(
            issues = issues.len(),
            changed_files = changed_files.len(),
            commits = comparison.commits.len(),
            "Resolved changeset"
        );

        Ok(Changeset {
            window,
            base,
            issues,
            changed_files,
            comparison_url: comparison.url,
        })
    }

    /// Runs the filter pipeline over already loaded candidates.
    ///
    /// # Errors
    ///
    /// Propagates a failed pull request lookup.
    pub async fn filter(
        &self,
        candidates: Vec<Issue>,
        window: &ChangesetWindow,
        comparison: &Comparison,
    ) -> Result<Vec<Issue>> {
        let mut issues = candidates;
        debug!(count = issues.len(), "Candidate issues");

        if let Some(since) = window.since {
            issues = stage("closed_after", issues, |i| window::closed_after(i, since));
        }

        issues = stage("closed_before", issues, |i| window::closed_before(i, window.until));
        issues = stage("drop_closed_by_pull", issues, filters::drop_closed_by_pull);

        let before = issues.len();
        issues = filters::drop_unmerged_pulls(
            issues,
            self.host,
            &self.config.repo,
            self.config.concurrency,
        )
        .await?;
        debug!(stage = "drop_unmerged_pulls", before, after = issues.len(), "Filtered");

        if comparison.commits.is_empty() {
            debug!("No commits in range, skipping commit evidence stages");
            return Ok(issues);
        }

        issues = stage("require_commit_evidence", issues, |i| {
            filters::require_commit_evidence(i, comparison)
        });
        issues = stage("require_merged_in_range", issues, |i| {
            filters::require_merged_in_range(i, comparison)
        });

        Ok(issues)
    }
}

fn stage(name: &str, issues: Vec<Issue>, filter: impl FnOnce(Vec<Issue>) -> Vec<Issue>) -> Vec<Issue> {
    let before = issues.len();
    let issues = filter(issues);
    debug!(stage = name, before, after = issues.len(), "Filtered");
    issues
}

/// Returns the watched paths present in the comparison, in caller order.
///
/// Paths are normalized before matching; each appears at most once.
#[must_use]
pub fn watched_changes(watched: &[String], comparison: &Comparison) -> Vec<String> {
    let mut seen = HashSet::new();
    watched
        .iter()
        .map(|path| normalize_path(path))
        .filter(|path| comparison.contains_file(path))
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

/// Lexically cleans a slash-separated path into its canonical form.
///
/// Empty and `.` segments are dropped, `..` removes the preceding segment
/// where there is one, and an empty result becomes `.`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if rooted {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}
