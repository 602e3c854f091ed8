//! GitHub REST API payloads.
//!
//! Only the fields the release pipeline reads are modelled. Each payload
//! converts into the host-neutral types of `tagnotes-release`.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tagnotes_release::{Comparison, Commit, Error, Issue, IssueKind, PullRequest, Result};

/// A user reference.
#[derive(Debug, Clone, Deserialize)]
pub struct UserDto {
    /// Login handle
    pub login: String,
}

/// A label attached to an issue.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelDto {
    /// Label name
    pub name: String,
}

/// An entry of `GET /repos/{owner}/{repo}/issues`.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueDto {
    /// Issue number
    pub number: u64,
    /// Title
    pub title: String,
    /// Author; absent for deleted accounts
    pub user: Option<UserDto>,
    /// Body text
    pub body: Option<String>,
    /// Labels
    #[serde(default)]
    pub labels: Vec<LabelDto>,
    /// Close timestamp
    pub closed_at: Option<DateTime<Utc>>,
    /// Browsable URL
    pub html_url: String,
    /// Present only when the issue is a pull request
    pub pull_request: Option<serde_json::Value>,
}

impl From<IssueDto> for Issue {
    fn from(dto: IssueDto) -> Self {
        Self {
            number: dto.number,
            kind: if dto.pull_request.is_some() {
                IssueKind::PullRequest
            } else {
                IssueKind::Issue
            },
            title: dto.title,
            author: login(dto.user),
            body: dto.body.unwrap_or_default(),
            labels: dto.labels.into_iter().map(|l| l.name).collect(),
            closed_at: dto.closed_at,
            url: dto.html_url,
        }
    }
}

/// `GET /repos/{owner}/{repo}/pulls/{number}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestDto {
    /// Pull request number
    pub number: u64,
    /// Title
    pub title: String,
    /// Author
    pub user: Option<UserDto>,
    /// Body text
    pub body: Option<String>,
    /// Labels
    #[serde(default)]
    pub labels: Vec<LabelDto>,
    /// Close timestamp
    pub closed_at: Option<DateTime<Utc>>,
    /// Browsable URL
    pub html_url: String,
    /// Whether the pull request was merged
    #[serde(default)]
    pub merged: bool,
    /// Merge timestamp
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<PullRequestDto> for PullRequest {
    fn from(dto: PullRequestDto) -> Self {
        Self {
            issue: Issue {
                number: dto.number,
                kind: IssueKind::PullRequest,
                title: dto.title,
                author: login(dto.user),
                body: dto.body.unwrap_or_default(),
                labels: dto.labels.into_iter().map(|l| l.name).collect(),
                closed_at: dto.closed_at,
                url: dto.html_url,
            },
            merged: dto.merged,
            merged_at: dto.merged_at,
        }
    }
}

/// The object a git reference or annotated tag points at.
#[derive(Debug, Clone, Deserialize)]
pub struct GitObjectDto {
    /// Object SHA
    pub sha: String,
    /// `commit` or `tag`
    #[serde(rename = "type")]
    pub kind: String,
}

impl GitObjectDto {
    /// Whether this object is an annotated tag that needs dereferencing.
    #[must_use]
    pub fn is_annotated_tag(&self) -> bool {
        self.kind == "tag"
    }
}

/// `GET /repos/{owner}/{repo}/git/ref/tags/{tag}`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitRefDto {
    /// Target object
    pub object: GitObjectDto,
}

/// `GET /repos/{owner}/{repo}/git/tags/{sha}`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitTagDto {
    /// Tagged object
    pub object: GitObjectDto,
}

/// A commit signature.
#[derive(Debug, Clone, Deserialize)]
pub struct SignatureDto {
    /// Signature timestamp
    pub date: DateTime<Utc>,
}

/// Git-level commit data.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetailDto {
    /// Full message
    pub message: String,
    /// Author signature
    pub author: Option<SignatureDto>,
    /// Committer signature
    pub committer: Option<SignatureDto>,
}

/// A commit as listed by the commits and compare endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitDto {
    /// Commit SHA
    pub sha: String,
    /// Git-level data
    pub commit: CommitDetailDto,
}

impl TryFrom<CommitDto> for Commit {
    type Error = Error;

    fn try_from(dto: CommitDto) -> Result<Self> {
        let authored_at = dto
            .commit
            .author
            .or(dto.commit.committer)
            .map(|signature| signature.date)
            .ok_or_else(|| {
                Error::host("commit", format!("commit {} carries no timestamp", dto.sha))
            })?;
        Ok(Self::new(dto.sha, dto.commit.message, authored_at))
    }
}

/// A file entry of a comparison.
#[derive(Debug, Clone, Deserialize)]
pub struct FileDto {
    /// Repository-relative path
    pub filename: String,
}

/// `GET /repos/{owner}/{repo}/compare/{base}...{head}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CompareDto {
    /// Browsable URL
    pub html_url: String,
    /// Commits, base to head
    #[serde(default)]
    pub commits: Vec<CommitDto>,
    /// Changed files
    #[serde(default)]
    pub files: Vec<FileDto>,
}

impl TryFrom<CompareDto> for Comparison {
    type Error = Error;

    fn try_from(dto: CompareDto) -> Result<Self> {
        Ok(Self {
            commits: dto
                .commits
                .into_iter()
                .map(Commit::try_from)
                .collect::<Result<_>>()?,
            changed_files: dto.files.into_iter().map(|f| f.filename).collect(),
            url: dto.html_url,
        })
    }
}

fn login(user: Option<UserDto>) -> String {
    user.map(|u| u.login).unwrap_or_else(|| "ghost".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_issue_conversion() {
        let dto: IssueDto = serde_json::from_value(json!({
            "number": 5,
            "title": "Crash on start",
            "user": { "login": "alice" },
            "body": null,
            "labels": [{ "name": "bug" }, { "name": "docs" }],
            "closed_at": "2024-06-01T12:00:00Z",
            "html_url": "https://github.com/octo/widgets/issues/5",
            "state": "closed"
        }))
        .unwrap();

        let issue = Issue::from(dto);
        assert_eq!(issue.number, 5);
        assert!(!issue.is_pull_request());
        assert_eq!(issue.author, "alice");
        assert_eq!(issue.body, "");
        assert_eq!(issue.labels, vec!["bug", "docs"]);
        assert!(issue.closed_at.is_some());
    }

    #[test]
    fn test_pull_request_flag() {
        let dto: IssueDto = serde_json::from_value(json!({
            "number": 10,
            "title": "Rewrite parser",
            "user": null,
            "body": "Fixes #11",
            "closed_at": "2024-06-01T12:00:00Z",
            "html_url": "https://github.com/octo/widgets/pull/10",
            "pull_request": { "url": "https://api.github.com/repos/octo/widgets/pulls/10" }
        }))
        .unwrap();

        let issue = Issue::from(dto);
        assert!(issue.is_pull_request());
        assert_eq!(issue.author, "ghost");
        assert!(issue.labels.is_empty());
    }

    #[test]
    fn test_pull_request_merge_status() {
        let dto: PullRequestDto = serde_json::from_value(json!({
            "number": 10,
            "title": "Rewrite parser",
            "user": { "login": "bob" },
            "body": null,
            "labels": [],
            "closed_at": "2024-06-01T12:00:00Z",
            "html_url": "https://github.com/octo/widgets/pull/10",
            "merged": true,
            "merged_at": "2024-06-01T12:00:00Z"
        }))
        .unwrap();

        let pull = PullRequest::from(dto);
        assert_eq!(pull.number(), 10);
        assert!(pull.merged);
        assert!(pull.issue.is_pull_request());
    }

    #[test]
    fn test_git_ref_kind() {
        let annotated: GitRefDto = serde_json::from_value(json!({
            "ref": "refs/tags/v1.0.0",
            "object": { "sha": "abc", "type": "tag", "url": "https://api.github.com" }
        }))
        .unwrap();
        assert!(annotated.object.is_annotated_tag());

        let lightweight: GitRefDto = serde_json::from_value(json!({
            "object": { "sha": "def", "type": "commit" }
        }))
        .unwrap();
        assert!(!lightweight.object.is_annotated_tag());
    }

    #[test]
    fn test_comparison_conversion() {
        let dto: CompareDto = serde_json::from_value(json!({
            "html_url": "https://github.com/octo/widgets/compare/v1...v2",
            "commits": [
                {
                    "sha": "1111111111",
                    "commit": {
                        "message": "Merge pull request #7 from octo/feature",
                        "author": { "name": "a", "date": "2024-06-01T10:00:00Z" },
                        "committer": { "name": "a", "date": "2024-06-01T10:05:00Z" }
                    }
                }
            ],
            "files": [{ "filename": "config/app.yml", "status": "modified" }]
        }))
        .unwrap();

        let comparison = Comparison::try_from(dto).unwrap();
        assert_eq!(comparison.commits.len(), 1);
        assert_eq!(comparison.commits[0].authored_at.to_rfc3339(), "2024-06-01T10:00:00+00:00");
        assert!(comparison.contains_file("config/app.yml"));
        assert_eq!(comparison.url, "https://github.com/octo/widgets/compare/v1...v2");
    }

    #[test]
    fn test_comparison_without_commits_or_files() {
        let dto: CompareDto = serde_json::from_value(json!({
            "html_url": "https://github.com/octo/widgets/compare/v1...v1"
        }))
        .unwrap();

        let comparison = Comparison::try_from(dto).unwrap();
        assert!(comparison.commits.is_empty());
        assert!(comparison.changed_files.is_empty());
    }

    #[test]
    fn test_commit_without_timestamp_is_rejected() {
        let dto: CommitDto = serde_json::from_value(json!({
            "sha": "abc",
            "commit": { "message": "x", "author": null, "committer": null }
        }))
        .unwrap();

        assert!(Commit::try_from(dto).is_err());
    }
}
