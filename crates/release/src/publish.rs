//! Release publishing.
//!
//! Publishing is two-phase and not transactional: the release object is
//! created or updated first, then every attachment is uploaded. A failed
//! upload leaves the release in place without the remaining attachments.

use crate::config::ReleaseConfig;
use crate::error::{Error, Result};
use crate::host::HostClient;
use crate::model::Release;
use tracing::{debug, info};

/// Result of a publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Nothing was sent to the host.
    DryRun {
        /// The compiled release body
        body: String,
    },
    /// The release was stored on the host.
    Published {
        /// Public URL of the release
        url: String,
        /// Whether the release was created rather than updated
        created: bool,
        /// Number of uploaded attachments
        assets: usize,
    },
}

/// Creates or updates the release for the configured tag.
pub struct ReleasePublisher<'a, H: ?Sized> {
    host: &'a H,
    config: &'a ReleaseConfig,
}

impl<'a, H> ReleasePublisher<'a, H>
where
    H: HostClient + ?Sized,
{
    /// Creates a publisher for the given configuration.
    #[must_use]
    pub const fn new(host: &'a H, config: &'a ReleaseConfig) -> Self {
        Self { host, config }
    }

    /// Checks every attachment is an existing file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Asset`] for the first attachment that is missing or
    /// not a regular file.
    pub fn check_attachments(&self) -> Result<()> {
        for path in &self.config.attachments {
            let metadata = std::fs::metadata(path).map_err(|e| {
                Error::asset(
                    format!("cannot read attachment {}: {e}", path.display()),
                    Some(path.clone()),
                )
            })?;
            if !metadata.is_file() {
                return Err(Error::asset(
                    format!("attachment {} is not a file", path.display()),
                    Some(path.clone()),
                ));
            }
        }
        Ok(())
    }

    /// Publishes `body` as the release for the configured tag.
    ///
    /// # Errors
    ///
    /// Returns an asset error before any host call when an attachment is
    /// unusable, and propagates the first host failure.
    pub async fn publish(&self, body: &str) -> Result<PublishOutcome> {
        if self.config.dry_run.is_dry_run() {
            debug!("Dry run, skipping release publish");
            return Ok(PublishOutcome::DryRun {
                body: body.to_string(),
            });
        }

        self.check_attachments()?;

        let repo = &self.config.repo;
        let tag = self.config.next.as_str();

        debug!(tag = %tag, "Checking for existing release");
        let existing = self.host.get_release_by_tag(repo, tag).await?;
        let created = existing.is_none();

        let release = self.prepare(existing, body);
        if created {
            info!(tag = %tag, "Creating release");
        } else {
            info!(tag = %tag, release_id = ?release.id, "Updating release");
        }

        let stored = self.host.create_or_update_release(repo, &release).await?;
        let release_id = stored
            .id
            .ok_or_else(|| Error::host("create_or_update_release", "host returned no release id"))?;

        for path in &self.config.attachments {
            debug!(path = %path.display(), release_id, "Uploading release asset");
            self.host.upload_asset(repo, release_id, path).await?;
        }

        let url = stored.html_url.unwrap_or_else(|| {
            format!("https://github.com/{repo}/releases/tag/{tag}")
        });

        info!(
            release_url = %url,
            uploaded_count = self.config.attachments.len(),
            "Published release"
        );

        Ok(PublishOutcome::Published {
            url,
            created,
            assets: self.config.attachments.len(),
        })
    }

    fn prepare(&self, existing: Option<Release>, body: &str) -> Release {
        let tag = self.config.next.clone();
        Release {
            id: existing.and_then(|r| r.id),
            name: tag.clone(),
            tag_name: tag,
            body: body.to_string(),
            draft: self.config.draft,
            prerelease: self.config.prerelease,
            html_url: None,
        }
    }
}
