//! Release-note compilation for tagged releases.
//!
//! This crate decides which closed issues and merged pull requests belong to
//! a release by reconciling three views reported by the source-control host:
//! the closed-issue listing, pull request merge status, and the commits
//! between the previous and the next tag.
//!
//! # Architecture
//!
//! - [`xref`] - closing and merge reference extraction from free text
//! - [`window`] - time bounds admitting closed issues
//! - [`filters`] - identity filters narrowing the candidate set
//! - [`resolver`] - the ordered pipeline producing a [`Changeset`]
//! - [`notes`] - Markdown rendering of the release body
//! - [`publish`] - release create/update and asset upload
//! - [`host`] - the [`HostClient`] collaborator trait
//!
//! # Example
//!
//! ```rust,ignore
//! use tagnotes_release::{ChangesetResolver, ReleaseConfig, RepoSlug, notes};
//!
//! let config = ReleaseConfig::new(RepoSlug::new("octo", "widgets"), "v1.2.0")
//!     .with_previous(Some("v1.1.0".to_string()));
//! let changeset = ChangesetResolver::new(&host, &config).resolve().await?;
//! let body = notes::render_changeset(&changeset, &config.labels);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod error;
pub mod filters;
pub mod host;
pub mod model;
pub mod notes;
pub mod publish;
pub mod resolver;
pub mod window;
pub mod xref;

// Re-export main types
pub use config::{DryRun, ReleaseConfig};
pub use error::{Error, Result};
pub use host::HostClient;
pub use model::{Comparison, Commit, Issue, IssueKind, PullRequest, Release, RepoSlug};
pub use publish::{PublishOutcome, ReleasePublisher};
pub use resolver::{Changeset, ChangesetResolver};
pub use window::ChangesetWindow;
