//! Release configuration.
//!
//! A [`ReleaseConfig`] is built once from the command line and passed
//! explicitly into the resolver and the publisher.

use crate::error::{Error, Result};
use crate::model::RepoSlug;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of concurrent pull request lookups.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Whether mutating host calls are performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DryRun {
    /// Create or update the release and upload attachments.
    #[default]
    No,
    /// Only compile the body.
    Yes,
}

impl DryRun {
    /// Whether this is a dry run.
    #[must_use]
    pub const fn is_dry_run(self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl From<bool> for DryRun {
    fn from(dry_run: bool) -> Self {
        if dry_run { Self::Yes } else { Self::No }
    }
}

/// Everything one release compilation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// Repository to compile the release for
    pub repo: RepoSlug,
    /// Previous release tag; unset means "from the first commit"
    pub previous: Option<String>,
    /// Tag being released
    pub next: String,
    /// Paths reported separately when changed
    pub watched: Vec<String>,
    /// Labels rendered next to issue titles, in display order
    pub labels: Vec<String>,
    /// Files uploaded as release assets
    pub attachments: Vec<PathBuf>,
    /// Mark the release as draft
    pub draft: bool,
    /// Mark the release as prerelease
    pub prerelease: bool,
    /// Skip every mutating call
    pub dry_run: DryRun,
    /// Maximum concurrent pull request lookups
    pub concurrency: usize,
}

impl ReleaseConfig {
    /// Creates a configuration for releasing `next` in `repo`.
    #[must_use]
    pub fn new(repo: RepoSlug, next: impl Into<String>) -> Self {
        Self {
            repo,
            previous: None,
            next: next.into(),
            watched: Vec::new(),
            labels: Vec::new(),
            attachments: Vec::new(),
            draft: false,
            prerelease: false,
            dry_run: DryRun::No,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Sets the previous tag. Empty strings are treated as unset.
    #[must_use]
    pub fn with_previous(mut self, previous: Option<String>) -> Self {
        self.previous = previous.filter(|p| !p.is_empty());
        self
    }

    /// Sets the watched paths.
    #[must_use]
    pub fn with_watched(mut self, watched: Vec<String>) -> Self {
        self.watched = watched;
        self
    }

    /// Sets the label allow-list.
    #[must_use]
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Sets the attachments.
    #[must_use]
    pub fn with_attachments(mut self, attachments: Vec<PathBuf>) -> Self {
        self.attachments = attachments;
        self
    }

    /// Sets the draft flag.
    #[must_use]
    pub const fn with_draft(mut self, draft: bool) -> Self {
        self.draft = draft;
        self
    }

    /// Sets the prerelease flag.
    #[must_use]
    pub const fn with_prerelease(mut self, prerelease: bool) -> Self {
        self.prerelease = prerelease;
        self
    }

    /// Sets dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: DryRun) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the pull request lookup concurrency.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// The previous tag to compare from, unless it is the release tag itself.
    #[must_use]
    pub fn previous_tag(&self) -> Option<&str> {
        self.previous
            .as_deref()
            .filter(|previous| *previous != self.next)
    }

    /// Rejects configurations that cannot produce a release.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a missing owner, repository or release
    /// tag, a zero concurrency, or an empty watched path or label.
    pub fn validate(&self) -> Result<()> {
        if self.repo.owner.trim().is_empty() {
            return Err(Error::config(
                "repository owner is required",
                "Pass --owner <OWNER> or set GITHUB_REPOSITORY=owner/repo",
            ));
        }
        if self.repo.repo.trim().is_empty() {
            return Err(Error::config(
                "repository name is required",
                "Pass --repo <REPO> or set GITHUB_REPOSITORY=owner/repo",
            ));
        }
        if self.next.trim().is_empty() {
            return Err(Error::config(
                "the tag being released is required",
                "Pass --next <TAG>",
            ));
        }
        if self.concurrency == 0 {
            return Err(Error::config(
                "concurrency must be at least 1",
                "Pass --concurrency 1 for strictly sequential lookups",
            ));
        }
        if self.watched.iter().any(|w| w.trim().is_empty()) {
            return Err(Error::config(
                "watched paths must not be empty",
                "Remove the empty --watch argument",
            ));
        }
        if self.labels.iter().any(|l| l.trim().is_empty()) {
            return Err(Error::config(
                "label names must not be empty",
                "Remove the empty --label argument",
            ));
        }
        Ok(())
    }
}
