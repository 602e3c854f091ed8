//! Connection settings for the GitHub host.

use octocrab::Octocrab;
use tagnotes_release::{Error, Result};

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Configuration for [`crate::GitHubHost`].
#[derive(Clone)]
pub struct GitHubHostConfig {
    /// Personal access token used for every request
    pub token: String,
    /// API base URL; `None` targets github.com
    pub api_url: Option<String>,
}

impl std::fmt::Debug for GitHubHostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubHostConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl GitHubHostConfig {
    /// Creates a configuration for github.com.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: None,
        }
    }

    /// Targets a GitHub Enterprise API endpoint.
    #[must_use]
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        self.api_url = api_url.filter(|url| !url.trim().is_empty());
        self
    }

    /// The API endpoint requests go to.
    #[must_use]
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Builds an authenticated client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the token is empty or the API URL
    /// cannot be parsed.
    pub fn client(&self) -> Result<Octocrab> {
        if self.token.trim().is_empty() {
            return Err(Error::config(
                "GitHub token is empty",
                "Pass --token or set GITHUB_TOKEN",
            ));
        }

        let mut builder = Octocrab::builder().personal_token(self.token.clone());
        if let Some(url) = &self.api_url {
            builder = builder
                .base_uri(url.as_str())
                .map_err(|e| {
                    Error::config(
                        format!("invalid API URL '{url}': {e}"),
                        "Pass the API root, e.g. https://github.example.com/api/v3",
                    )
                })?;
        }

        builder
            .build()
            .map_err(|e| {
                Error::config(
                    format!("failed to create GitHub client: {e}"),
                    "Check the token and API URL",
                )
            })
    }
}
