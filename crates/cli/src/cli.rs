use crate::tracing::{Level, LogLevel, TracingConfig, TracingFormat};
use clap::Parser;
use std::path::PathBuf;
use tagnotes_github::GitHubHostConfig;
use tagnotes_release::config::DEFAULT_CONCURRENCY;
use tagnotes_release::{DryRun, Error, ReleaseConfig, RepoSlug, Result};

#[derive(Parser, Debug)]
#[command(name = "tagnotes")]
#[command(
    about = "Compile release notes from the issues and pull requests closed between two tags and publish them as a GitHub release"
)]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "GitHub API token"
    )]
    pub token: String,

    #[arg(long, help = "Repository owner")]
    pub owner: Option<String>,

    #[arg(long, help = "Repository name")]
    pub repo: Option<String>,

    /// `owner/repo`, used when neither --owner nor --repo is given.
    #[arg(long = "repository", env = "GITHUB_REPOSITORY", hide = true)]
    pub repository: Option<String>,

    #[arg(long, help = "Tag the release is published for")]
    pub next: String,

    #[arg(long, help = "Tag of the previous release; defaults to the first commit")]
    pub previous: Option<String>,

    #[arg(long, help = "Publish the release as a draft")]
    pub draft: bool,

    #[arg(long, help = "Mark the release as a prerelease")]
    pub prerelease: bool,

    #[arg(long = "attachment", value_name = "FILE", help = "File to upload as a release asset")]
    pub attachments: Vec<PathBuf>,

    #[arg(long = "watch", value_name = "FILE", help = "File whose changes are listed separately")]
    pub watched: Vec<String>,

    #[arg(long = "label", value_name = "NAME", help = "Label shown next to matching entries")]
    pub labels: Vec<String>,

    #[arg(
        long,
        visible_alias = "print",
        help = "Print the release body instead of publishing"
    )]
    pub dry_run: bool,

    #[arg(
        long,
        default_value_t = DEFAULT_CONCURRENCY,
        help = "Concurrent pull request lookups"
    )]
    pub concurrency: usize,

    #[arg(long, env = "GITHUB_API_URL", help = "GitHub API base URL (GitHub Enterprise)")]
    pub api_url: Option<String>,

    #[arg(short, long, help = "Verbose logging (debug level)")]
    pub verbose: bool,

    #[arg(
        short = 'l',
        long,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(long, help = "Output logs in JSON format")]
    pub json: bool,
}

impl Cli {
    /// Repository the release belongs to.
    ///
    /// `--owner`/`--repo` win; `GITHUB_REPOSITORY` fills in when both are absent.
    pub fn repo_slug(&self) -> Result<RepoSlug> {
        match (&self.owner, &self.repo) {
            (Some(owner), Some(repo)) => Ok(RepoSlug::new(owner, repo)),
            (None, None) => self
                .repository
                .as_deref()
                .and_then(RepoSlug::parse)
                .ok_or_else(|| {
                    Error::config(
                        "repository is not set",
                        "Pass --owner and --repo, or set GITHUB_REPOSITORY=owner/repo",
                    )
                }),
            (Some(_), None) => Err(Error::config(
                "--owner given without --repo",
                "Pass both --owner and --repo",
            )),
            (None, Some(_)) => Err(Error::config(
                "--repo given without --owner",
                "Pass both --owner and --repo",
            )),
        }
    }

    /// Builds the release configuration from the parsed arguments.
    pub fn release_config(&self) -> Result<ReleaseConfig> {
        let config = ReleaseConfig::new(self.repo_slug()?, self.next.clone())
            .with_previous(self.previous.clone())
            .with_watched(self.watched.clone())
            .with_labels(self.labels.clone())
            .with_attachments(self.attachments.clone())
            .with_draft(self.draft)
            .with_prerelease(self.prerelease)
            .with_dry_run(DryRun::from(self.dry_run))
            .with_concurrency(self.concurrency);
        config.validate()?;
        Ok(config)
    }

    pub fn host_config(&self) -> GitHubHostConfig {
        GitHubHostConfig::new(self.token.clone()).with_api_url(self.api_url.clone())
    }

    pub fn tracing_config(&self) -> TracingConfig {
        let mut level = Level::from(self.level);
        if self.verbose {
            level = level.max(Level::DEBUG);
        }

        let format = if self.json {
            TracingFormat::Json
        } else if self.verbose {
            TracingFormat::Dev
        } else {
            TracingFormat::Compact
        };

        TracingConfig {
            format,
            level,
            enable_file_location: self.verbose,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Cli {
        let mut args = vec![
            "tagnotes", "--token", "t0k3n", "--owner", "octo", "--repo", "widgets", "--next",
            "v1.1.0",
        ];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_default_values() {
        let cli = parse(&[]);

        assert_eq!(cli.token, "t0k3n");
        assert_eq!(cli.next, "v1.1.0");
        assert!(cli.previous.is_none());
        assert!(!cli.draft);
        assert!(!cli.prerelease);
        assert!(!cli.dry_run);
        assert!(cli.attachments.is_empty());
        assert_eq!(cli.concurrency, DEFAULT_CONCURRENCY);
        assert!(matches!(cli.level, LogLevel::Warn));
        assert!(!cli.json);
    }

    #[test]
    fn test_repeated_options() {
        let cli = parse(&[
            "--attachment",
            "dist/a.tar.gz",
            "--attachment",
            "dist/b.tar.gz",
            "--watch",
            "config/app.yml",
            "--label",
            "bug",
            "--label",
            "docs",
        ]);

        assert_eq!(
            cli.attachments,
            vec![PathBuf::from("dist/a.tar.gz"), PathBuf::from("dist/b.tar.gz")]
        );
        assert_eq!(cli.watched, vec!["config/app.yml"]);
        assert_eq!(cli.labels, vec!["bug", "docs"]);
    }

    #[test]
    fn test_print_is_alias_for_dry_run() {
        assert!(parse(&["--print"]).dry_run);
        assert!(parse(&["--dry-run"]).dry_run);
    }

    #[test]
    fn test_release_config() {
        let cli = parse(&["--previous", "v1.0.0", "--draft", "--prerelease", "--dry-run"]);
        let config = cli.release_config().unwrap();

        assert_eq!(config.repo, RepoSlug::new("octo", "widgets"));
        assert_eq!(config.previous_tag(), Some("v1.0.0"));
        assert!(config.draft);
        assert!(config.prerelease);
        assert!(config.dry_run.is_dry_run());
    }

    #[test]
    fn test_repository_fallback() {
        let cli = Cli::try_parse_from([
            "tagnotes",
            "--token",
            "t",
            "--repository",
            "octo/widgets",
            "--next",
            "v1",
        ])
        .unwrap();

        assert_eq!(cli.repo_slug().unwrap(), RepoSlug::new("octo", "widgets"));
    }

    #[test]
    fn test_explicit_repo_beats_fallback() {
        let cli = parse(&["--repository", "someone/else"]);
        assert_eq!(cli.repo_slug().unwrap(), RepoSlug::new("octo", "widgets"));
    }

    #[test]
    fn test_partial_repo_rejected() {
        let cli = Cli::try_parse_from([
            "tagnotes", "--token", "t", "--owner", "octo", "--next", "v1",
        ])
        .unwrap();
        assert!(matches!(cli.repo_slug(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let cli = parse(&["--concurrency", "0"]);
        assert!(matches!(cli.release_config(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_missing_next_is_usage_error() {
        let result = Cli::try_parse_from(["tagnotes", "--token", "t"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_raises_level() {
        let tracing = parse(&["-v"]).tracing_config();
        assert_eq!(tracing.level, Level::DEBUG);
        assert_eq!(tracing.format, TracingFormat::Dev);

        let tracing = parse(&["-v", "--level", "trace"]).tracing_config();
        assert_eq!(tracing.level, Level::TRACE);
    }

    #[test]
    fn test_json_logs() {
        let tracing = parse(&["--json", "-l", "info"]).tracing_config();
        assert_eq!(tracing.format, TracingFormat::Json);
        assert_eq!(tracing.level, Level::INFO);
    }

    #[test]
    fn test_host_config() {
        let cli = parse(&["--api-url", "https://github.example.com/api/v3"]);
        let host = cli.host_config();
        assert_eq!(host.token, "t0k3n");
        assert_eq!(host.api_url(), "https://github.example.com/api/v3");
    }
}
