//! [`HostClient`] implementation backed by the GitHub REST API.

use crate::config::GitHubHostConfig;
use crate::models::{
    CommitDto, CompareDto, GitObjectDto, GitRefDto, GitTagDto, IssueDto, PullRequestDto,
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use octocrab::{Octocrab, Page};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use std::future::Future;
use std::path::Path;
use tagnotes_release::{
    Comparison, Commit, Error, HostClient, Issue, PullRequest, Release, RepoSlug, Result,
};
use tracing::{debug, info};

/// Largest page size the API accepts.
const PER_PAGE: u8 = 100;

/// Tag objects followed from a ref before giving up.
const MAX_TAG_DEPTH: usize = 8;

/// Characters escaped in the `name` query parameter of an asset upload.
const ASSET_NAME: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Serialize)]
struct ClosedIssuesQuery {
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    since: Option<String>,
    per_page: u8,
}

#[derive(Debug, Serialize)]
struct PageQuery {
    per_page: u8,
}

/// GitHub-backed release host.
#[derive(Clone)]
pub struct GitHubHost {
    client: Octocrab,
}

impl GitHubHost {
    /// Creates a host from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the client cannot be built.
    pub fn new(config: &GitHubHostConfig) -> Result<Self> {
        Ok(Self {
            client: config.client()?,
        })
    }

    /// Wraps an existing client.
    #[must_use]
    pub const fn from_client(client: Octocrab) -> Self {
        Self { client }
    }

    async fn fetch_commit(&self, repo: &RepoSlug, sha: &str) -> Result<Commit> {
        let dto: CommitDto = self
            .client
            .get(commit_route(repo, sha), None::<&()>)
            .await
            .map_err(|e| map_error("get_commit", || format!("commit {sha}"), e))?;
        Commit::try_from(dto)
    }
}

#[async_trait]
impl HostClient for GitHubHost {
    async fn resolve_tag_to_commit(&self, repo: &RepoSlug, tag: &str) -> Result<Commit> {
        let reference: GitRefDto = self
            .client
            .get(tag_ref_route(repo, tag), None::<&()>)
            .await
            .map_err(|e| map_error("get_ref", || format!("tag {tag} in {repo}"), e))?;

        let sha = peel_tag(tag, reference.object, |sha| async move {
            let annotated: GitTagDto = self
                .client
                .get(annotated_tag_route(repo, &sha), None::<&()>)
                .await
                .map_err(|e| map_error("get_tag", || format!("tag object {sha}"), e))?;
            Ok(annotated.object)
        })
        .await?;

        self.fetch_commit(repo, &sha).await
    }

    async fn first_commit(&self, repo: &RepoSlug) -> Result<Commit> {
        let route = format!("/repos/{}/{}/commits", repo.owner, repo.repo);
        let first: Page<CommitDto> = self
            .client
            .get(route, Some(&PageQuery { per_page: PER_PAGE }))
            .await
            .map_err(|e| map_error("list_commits", || format!("commits of {repo}"), e))?;

        // Listing is newest first; the oldest commit closes the last page.
        let oldest_page = if first.last.is_some() {
            self.client
                .get_page::<CommitDto>(&first.last)
                .await
                .map_err(|e| map_error("list_commits", || format!("commits of {repo}"), e))?
                .unwrap_or(first)
        } else {
            first
        };

        let dto = oldest_page
            .items
            .into_iter()
            .last()
            .ok_or_else(|| Error::not_found(format!("first commit of {repo}")))?;
        Commit::try_from(dto)
    }

    async fn list_closed_issues_since(
        &self,
        repo: &RepoSlug,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Issue>> {
        let query = ClosedIssuesQuery {
            state: "closed",
            since: since.map(|s| s.to_rfc3339_opts(SecondsFormat::Secs, true)),
            per_page: PER_PAGE,
        };
        let route = format!("/repos/{}/{}/issues", repo.owner, repo.repo);

        let page: Page<IssueDto> = self
            .client
            .get(route, Some(&query))
            .await
            .map_err(|e| map_error("list_issues", || format!("issues of {repo}"), e))?;
        let issues = self
            .client
            .all_pages(page)
            .await
            .map_err(|e| map_error("list_issues", || format!("issues of {repo}"), e))?;

        debug!(count = issues.len(), since = ?query.since, "Fetched closed issues");
        Ok(issues.into_iter().map(Issue::from).collect())
    }

    async fn compare(&self, repo: &RepoSlug, base: &str, head: &str) -> Result<Comparison> {
        let dto: CompareDto = self
            .client
            .get(compare_route(repo, base, head), None::<&()>)
            .await
            .map_err(|e| map_error("compare", || format!("range {base}...{head}"), e))?;
        Comparison::try_from(dto)
    }

    async fn get_pull_request(&self, repo: &RepoSlug, number: u64) -> Result<PullRequest> {
        let route = format!("/repos/{}/{}/pulls/{number}", repo.owner, repo.repo);
        let dto: PullRequestDto = self
            .client
            .get(route, None::<&()>)
            .await
            .map_err(|e| map_error("get_pull_request", || format!("pull request #{number}"), e))?;
        Ok(PullRequest::from(dto))
    }

    async fn get_release_by_tag(&self, repo: &RepoSlug, tag: &str) -> Result<Option<Release>> {
        let repos = self.client.repos(&repo.owner, &repo.repo);
        match repos.releases().get_by_tag(tag).await {
            Ok(release) => Ok(Some(release_from_model(release))),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(Error::host("get_release_by_tag", e.to_string())),
        }
    }

    async fn create_or_update_release(&self, repo: &RepoSlug, release: &Release) -> Result<Release> {
        let repos = self.client.repos(&repo.owner, &repo.repo);
        let releases = repos.releases();

        let stored = if let Some(id) = release.id {
            debug!(id, tag = %release.tag_name, "PATCH release");
            releases
                .update(id)
                .tag_name(&release.tag_name)
                .name(&release.name)
                .body(&release.body)
                .draft(release.draft)
                .prerelease(release.prerelease)
                .send()
                .await
                .map_err(|e| Error::host("update_release", e.to_string()))?
        } else {
            debug!(tag = %release.tag_name, "POST release");
            releases
                .create(&release.tag_name)
                .name(&release.name)
                .body(&release.body)
                .draft(release.draft)
                .prerelease(release.prerelease)
                .send()
                .await
                .map_err(|e| Error::host("create_release", e.to_string()))?
        };

        Ok(release_from_model(stored))
    }

    async fn upload_asset(&self, repo: &RepoSlug, release_id: u64, path: &Path) -> Result<()> {
        let name = asset_name(path)?;
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| Error::asset(e.to_string(), Some(path.to_path_buf())))?;

        let repos = self.client.repos(&repo.owner, &repo.repo);
        let asset = repos
            .releases()
            .upload_asset(release_id, &encode_asset_name(&name), Bytes::from(data))
            .send()
            .await
            .map_err(|e| Error::host("upload_asset", format!("{name}: {e}")))?;

        info!(asset = %name, url = %asset.browser_download_url, "Uploaded release asset");
        Ok(())
    }
}

fn tag_ref_route(repo: &RepoSlug, tag: &str) -> String {
    format!("/repos/{}/{}/git/ref/tags/{tag}", repo.owner, repo.repo)
}

fn annotated_tag_route(repo: &RepoSlug, sha: &str) -> String {
    format!("/repos/{}/{}/git/tags/{sha}", repo.owner, repo.repo)
}

fn commit_route(repo: &RepoSlug, sha: &str) -> String {
    format!("/repos/{}/{}/commits/{sha}", repo.owner, repo.repo)
}

fn compare_route(repo: &RepoSlug, base: &str, head: &str) -> String {
    format!("/repos/{}/{}/compare/{base}...{head}", repo.owner, repo.repo)
}

/// Asset name shown on the release page: the attachment's file name.
fn asset_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(ToString::to_string)
        .ok_or_else(|| Error::asset("attachment has no file name", Some(path.to_path_buf())))
}

/// Escapes an asset name for the upload URL, which is built without encoding.
fn encode_asset_name(name: &str) -> String {
    utf8_percent_encode(name, ASSET_NAME).to_string()
}

/// Follows annotated tag objects until reaching a non-tag object and returns its SHA.
///
/// Tags may point at other tags; `fetch_tag` loads the tag object with the given SHA.
async fn peel_tag<F, Fut>(tag: &str, mut object: GitObjectDto, mut fetch_tag: F) -> Result<String>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<GitObjectDto>>,
{
    let mut depth = 0;
    while object.is_annotated_tag() {
        if depth == MAX_TAG_DEPTH {
            return Err(Error::host(
                "get_tag",
                format!("tag {tag} nests more than {MAX_TAG_DEPTH} tag objects"),
            ));
        }
        depth += 1;
        debug!(tag, sha = %object.sha, depth, "Dereferencing annotated tag");
        object = fetch_tag(object.sha).await?;
    }
    Ok(object.sha)
}

fn is_not_found(err: &octocrab::Error) -> bool {
    matches!(err, octocrab::Error::GitHub { source, .. } if source.message.contains("Not Found"))
}

fn map_error(operation: &str, resource: impl FnOnce() -> String, err: octocrab::Error) -> Error {
    if is_not_found(&err) {
        Error::not_found(resource())
    } else {
        Error::host(operation, err.to_string())
    }
}

fn release_from_model(release: octocrab::models::repos::Release) -> Release {
    Release {
        id: Some(release.id.0),
        tag_name: release.tag_name,
        name: release.name.unwrap_or_default(),
        body: release.body.unwrap_or_default(),
        draft: release.draft,
        prerelease: release.prerelease,
        html_url: Some(release.html_url.to_string()),
    }
}
