//! GitHub host for `tagnotes`.
//!
//! [`GitHubHost`] implements [`tagnotes_release::HostClient`] on top of the
//! GitHub REST API through `octocrab`. Read endpoints are decoded into the
//! payload types in [`models`]; releases go through octocrab's release
//! handler.

#![warn(missing_docs)]

pub mod config;
pub mod host;
pub mod models;

pub use config::{DEFAULT_API_URL, GitHubHostConfig};
pub use host::GitHubHost;
