//! In-memory host used by the integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tagnotes_release::{
    Comparison, Commit, Error, HostClient, Issue, PullRequest, Release, RepoSlug, Result,
};

/// Fixed reference point all fixtures are expressed against.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// `t0` shifted by whole seconds.
pub fn at(secs: i64) -> DateTime<Utc> {
    t0() + Duration::seconds(secs)
}

pub fn commit(sha: &str, message: &str, authored_at: DateTime<Utc>) -> Commit {
    Commit::new(sha, message, authored_at)
}

pub fn repo() -> RepoSlug {
    RepoSlug::new("octo", "widgets")
}

pub fn numbers(issues: &[Issue]) -> Vec<u64> {
    issues.iter().map(|i| i.number).collect()
}

#[derive(Default)]
pub struct FakeHost {
    pub tags: HashMap<String, Commit>,
    pub first: Option<Commit>,
    pub issues: Vec<Issue>,
    pub comparison: Comparison,
    pub merged: HashMap<u64, bool>,
    pub releases: Mutex<HashMap<String, Release>>,
    pub uploads: Mutex<Vec<(u64, PathBuf)>>,
    pub calls: Mutex<Vec<String>>,
    pub fail_uploads: bool,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, tag: &str, commit: Commit) -> Self {
        self.tags.insert(tag.to_string(), commit);
        self
    }

    pub fn with_first_commit(mut self, commit: Commit) -> Self {
        self.first = Some(commit);
        self
    }

    pub fn with_issues(mut self, issues: Vec<Issue>) -> Self {
        self.issues = issues;
        self
    }

    pub fn with_comparison(mut self, comparison: Comparison) -> Self {
        self.comparison = comparison;
        self
    }

    pub fn with_merge_status(mut self, number: u64, merged: bool) -> Self {
        self.merged.insert(number, merged);
        self
    }

    pub fn with_release(self, release: Release) -> Self {
        self.releases
            .lock()
            .unwrap()
            .insert(release.tag_name.clone(), release);
        self
    }

    pub fn failing_uploads(mut self) -> Self {
        self.fail_uploads = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<(u64, PathBuf)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn release(&self, tag: &str) -> Option<Release> {
        self.releases.lock().unwrap().get(tag).cloned()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl HostClient for FakeHost {
    async fn resolve_tag_to_commit(&self, _: &RepoSlug, tag: &str) -> Result<Commit> {
        self.record(format!("resolve_tag_to_commit {tag}"));
        self.tags
            .get(tag)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("tag {tag}")))
    }

    async fn first_commit(&self, _: &RepoSlug) -> Result<Commit> {
        self.record("first_commit".to_string());
        self.first
            .clone()
            .ok_or_else(|| Error::not_found("first commit"))
    }

    async fn list_closed_issues_since(
        &self,
        _: &RepoSlug,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Issue>> {
        let since = since.map_or_else(|| "none".to_string(), |s| s.to_rfc3339());
        self.record(format!("list_closed_issues_since {since}"));
        Ok(self.issues.clone())
    }

    async fn compare(&self, _: &RepoSlug, base: &str, head: &str) -> Result<Comparison> {
        self.record(format!("compare {base}...{head}"));
        Ok(self.comparison.clone())
    }

    async fn get_pull_request(&self, _: &RepoSlug, number: u64) -> Result<PullRequest> {
        self.record(format!("get_pull_request {number}"));
        let merged = *self
            .merged
            .get(&number)
            .ok_or_else(|| Error::host("get_pull_request", format!("#{number}: 502 Bad Gateway")))?;
        let issue = self
            .issues
            .iter()
            .find(|i| i.number == number)
            .cloned()
            .unwrap_or_else(|| Issue::pull_request(number, "unknown"));
        Ok(PullRequest {
            issue,
            merged,
            merged_at: None,
        })
    }

    async fn get_release_by_tag(&self, _: &RepoSlug, tag: &str) -> Result<Option<Release>> {
        self.record(format!("get_release_by_tag {tag}"));
        Ok(self.release(tag))
    }

    async fn create_or_update_release(&self, repo: &RepoSlug, release: &Release) -> Result<Release> {
        let verb = if release.id.is_some() { "update" } else { "create" };
        self.record(format!("{verb}_release {}", release.tag_name));

        let mut releases = self.releases.lock().unwrap();
        let id = release.id.unwrap_or(1000 + releases.len() as u64);
        let stored = Release {
            id: Some(id),
            html_url: Some(format!(
                "https://github.com/{repo}/releases/tag/{}",
                release.tag_name
            )),
            ..release.clone()
        };
        releases.insert(stored.tag_name.clone(), stored.clone());
        Ok(stored)
    }

    async fn upload_asset(&self, _: &RepoSlug, release_id: u64, path: &Path) -> Result<()> {
        self.record(format!("upload_asset {}", path.display()));
        if self.fail_uploads {
            return Err(Error::host("upload_asset", "422 Unprocessable Entity"));
        }
        self.uploads
            .lock()
            .unwrap()
            .push((release_id, path.to_path_buf()));
        Ok(())
    }
}
