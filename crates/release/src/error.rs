//! Error types for release-note compilation and publishing.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or publishing a release.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Missing or invalid configuration, rejected before any host call.
    #[error("Release configuration error: {message}")]
    #[diagnostic(code(tagnotes::release::config), help("{help}"))]
    Config {
        /// The error message
        message: String,
        /// Help text for the user
        help: String,
    },

    /// The host API call failed (network, authentication, rate limit).
    #[error("Host request failed during {operation}: {message}")]
    #[diagnostic(
        code(tagnotes::release::host),
        help("Check the API token, the repository name and your network connection")
    )]
    Host {
        /// The collaborator operation that failed
        operation: String,
        /// The error message
        message: String,
    },

    /// A referenced tag, commit or pull request does not exist.
    #[error("Not found: {resource}")]
    #[diagnostic(
        code(tagnotes::release::not_found),
        help("Ensure the tag has been pushed to the remote repository")
    )]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// A release attachment could not be read or uploaded.
    #[error("Asset error: {message}")]
    #[diagnostic(
        code(tagnotes::release::asset),
        help("Check that the attachment exists and is a readable file")
    )]
    Asset {
        /// The error message
        message: String,
        /// The attachment path
        path: Option<PathBuf>,
    },
}

impl Error {
    /// Create a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: help.into(),
        }
    }

    /// Create a new host error for the given operation.
    #[must_use]
    pub fn host(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Host {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a new not-found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a new asset error.
    #[must_use]
    pub fn asset(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Asset {
            message: message.into(),
            path,
        }
    }
}
