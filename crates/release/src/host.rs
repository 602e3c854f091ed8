//! Source-control host collaborator.
//!
//! The resolver and publisher talk to the host only through [`HostClient`],
//! so they can run against the GitHub implementation in `tagnotes-github` or
//! an in-memory double in tests.

use crate::error::Result;
use crate::model::{Comparison, Commit, Issue, PullRequest, Release, RepoSlug};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Operations the release pipeline consumes from the source-control host.
///
/// Every method is a blocking step of the run: failures are fatal and are
/// never retried by callers.
#[async_trait]
pub trait HostClient: Send + Sync {
    /// Dereferences a lightweight or annotated tag to its commit.
    async fn resolve_tag_to_commit(&self, repo: &RepoSlug, tag: &str) -> Result<Commit>;

    /// Returns the oldest commit reachable from the default branch.
    async fn first_commit(&self, repo: &RepoSlug) -> Result<Commit>;

    /// Lists every closed issue and pull request, draining pagination.
    /// `since` unset means all history.
    async fn list_closed_issues_since(
        &self,
        repo: &RepoSlug,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Issue>>;

    /// Compares two revisions.
    async fn compare(&self, repo: &RepoSlug, base: &str, head: &str) -> Result<Comparison>;

    /// Fetches a pull request with its merge status.
    async fn get_pull_request(&self, repo: &RepoSlug, number: u64) -> Result<PullRequest>;

    /// Looks up the release for a tag; `None` when there is none yet.
    async fn get_release_by_tag(&self, repo: &RepoSlug, tag: &str) -> Result<Option<Release>>;

    /// Creates the release when `release.id` is unset, otherwise updates it.
    async fn create_or_update_release(&self, repo: &RepoSlug, release: &Release) -> Result<Release>;

    /// Uploads a file as a release asset named after the file.
    async fn upload_asset(&self, repo: &RepoSlug, release_id: u64, path: &Path) -> Result<()>;
}
