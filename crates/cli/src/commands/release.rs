//! Compile and publish one release.

use tagnotes_github::{GitHubHost, GitHubHostConfig};
use tagnotes_release::{
    ChangesetResolver, HostClient, PublishOutcome, ReleaseConfig, ReleasePublisher, Result, notes,
};
use tracing::warn;

/// Compiles the release body for `config` and publishes it unless this is
/// a dry run.
///
/// # Errors
///
/// Returns the first configuration, host or asset error encountered.
pub async fn execute_release(
    config: &ReleaseConfig,
    host_config: &GitHubHostConfig,
) -> Result<PublishOutcome> {
    let host = GitHubHost::new(host_config)?;
    run(&host, config).await
}

async fn run<H: HostClient + ?Sized>(host: &H, config: &ReleaseConfig) -> Result<PublishOutcome> {
    let publisher = ReleasePublisher::new(host, config);
    if !config.dry_run.is_dry_run() {
        // Fail on a bad attachment path before spending API calls.
        publisher.check_attachments()?;
    }

    let changeset = ChangesetResolver::new(host, config).resolve().await?;
    if changeset.issues.is_empty() {
        warn!(
            base = %changeset.base,
            next = %config.next,
            "No closed issues or merged pull requests found for this release"
        );
    }

    let body = notes::render_changeset(&changeset, &config.labels);
    publisher.publish(&body).await
}

/// Text written to stdout for an outcome.
#[must_use]
pub fn render_outcome(outcome: &PublishOutcome) -> String {
    match outcome {
        PublishOutcome::DryRun { body } => body.clone(),
        PublishOutcome::Published { url, .. } => url.clone(),
    }
}
