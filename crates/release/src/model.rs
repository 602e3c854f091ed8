//! Read-only snapshots of host entities.
//!
//! Everything here is loaded once per run and only ever filtered, never
//! mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Repository coordinates on the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSlug {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepoSlug {
    /// Creates a new repository slug.
    #[must_use]
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parses an `owner/repo` string, as found in `GITHUB_REPOSITORY`.
    #[must_use]
    pub fn parse(slug: &str) -> Option<Self> {
        let (owner, repo) = slug.trim().split_once('/')?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some(Self::new(owner, repo))
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Whether an issue record is a plain issue or a pull request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A plain issue.
    #[default]
    Issue,
    /// A pull request, as reported through the issue listing.
    PullRequest,
}

/// A closed issue or pull request as reported by the issue listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number, unique within a repository
    pub number: u64,
    /// Issue or pull request
    pub kind: IssueKind,
    /// Title
    pub title: String,
    /// Author login handle
    pub author: String,
    /// Body text, empty when the host reports none
    pub body: String,
    /// Label names
    pub labels: Vec<String>,
    /// When the issue was closed; unset means open
    pub closed_at: Option<DateTime<Utc>>,
    /// Browsable URL
    pub url: String,
}

impl Issue {
    /// Creates a plain issue with empty metadata.
    #[must_use]
    pub fn new(number: u64, title: impl Into<String>) -> Self {
        Self {
            number,
            kind: IssueKind::Issue,
            title: title.into(),
            author: String::new(),
            body: String::new(),
            labels: Vec::new(),
            closed_at: None,
            url: String::new(),
        }
    }

    /// Creates a pull request record with empty metadata.
    #[must_use]
    pub fn pull_request(number: u64, title: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::PullRequest,
            ..Self::new(number, title)
        }
    }

    /// Sets the author handle.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Sets the body text.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the label names.
    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the closed-at timestamp.
    #[must_use]
    pub const fn with_closed_at(mut self, closed_at: DateTime<Utc>) -> Self {
        self.closed_at = Some(closed_at);
        self
    }

    /// Sets the browsable URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Whether this record is a pull request.
    #[must_use]
    pub fn is_pull_request(&self) -> bool {
        self.kind == IssueKind::PullRequest
    }

    /// Whether the issue carries the named label.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// A pull request with its merge status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// The underlying issue record
    pub issue: Issue,
    /// Whether the pull request was merged (as opposed to closed unmerged)
    pub merged: bool,
    /// When it was merged
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// Pull request number.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.issue.number
    }
}

/// A single commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Commit SHA
    pub sha: String,
    /// Full commit message
    pub message: String,
    /// Author timestamp
    pub authored_at: DateTime<Utc>,
}

impl Commit {
    /// Creates a new commit.
    #[must_use]
    pub fn new(sha: impl Into<String>, message: impl Into<String>, authored_at: DateTime<Utc>) -> Self {
        Self {
            sha: sha.into(),
            message: message.into(),
            authored_at,
        }
    }

    /// The abbreviated SHA used as a comparison base.
    #[must_use]
    pub fn short_sha(&self) -> &str {
        self.sha.get(..8).unwrap_or(&self.sha)
    }
}

/// Commits and file changes between a base and head revision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    /// Commits ordered base to head, oldest first
    pub commits: Vec<Commit>,
    /// Paths of every file changed in the range
    pub changed_files: BTreeSet<String>,
    /// Browsable URL for the comparison
    pub url: String,
}

impl Comparison {
    /// Whether the comparison contains the given path.
    #[must_use]
    pub fn contains_file(&self, path: &str) -> bool {
        self.changed_files.contains(path)
    }

    /// Iterates over every commit message in order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.commits.iter().map(|c| c.message.as_str())
    }
}

/// A release object on the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Host identifier; unset for a release that has not been created
    pub id: Option<u64>,
    /// Git tag the release points at
    pub tag_name: String,
    /// Display name
    pub name: String,
    /// Markdown body
    pub body: String,
    /// Draft flag
    pub draft: bool,
    /// Prerelease flag
    pub prerelease: bool,
    /// Public URL, known once the host has stored the release
    pub html_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_repo_slug_parse() {
        let slug = RepoSlug::parse("octo/widgets").unwrap();
        assert_eq!(slug.owner, "octo");
        assert_eq!(slug.repo, "widgets");
        assert_eq!(slug.to_string(), "octo/widgets");
    }

    #[test]
    fn test_repo_slug_parse_invalid() {
        assert!(RepoSlug::parse("").is_none());
        assert!(RepoSlug::parse("octo").is_none());
        assert!(RepoSlug::parse("/widgets").is_none());
        assert!(RepoSlug::parse("octo/").is_none());
        assert!(RepoSlug::parse("octo/widgets/extra").is_none());
    }

    #[test]
    fn test_issue_builders() {
        let issue = Issue::pull_request(4, "Add cache")
            .with_author("alice")
            .with_body("Fixes #3")
            .with_labels(["feature"]);

        assert!(issue.is_pull_request());
        assert!(issue.has_label("feature"));
        assert!(!issue.has_label("bug"));
        assert_eq!(issue.author, "alice");
        assert!(issue.closed_at.is_none());
    }

    #[test]
    fn test_plain_issue_kind() {
        assert!(!Issue::new(1, "Crash").is_pull_request());
    }

    #[test]
    fn test_short_sha() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let commit = Commit::new("0123456789abcdef", "init", at);
        assert_eq!(commit.short_sha(), "01234567");

        let short = Commit::new("abc", "init", at);
        assert_eq!(short.short_sha(), "abc");
    }

    #[test]
    fn test_comparison_contains_file() {
        let comparison = Comparison {
            changed_files: ["src/main.rs".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert!(comparison.contains_file("src/main.rs"));
        assert!(!comparison.contains_file("README.md"));
    }
}
