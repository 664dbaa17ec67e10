//! Fetching config repos for sane.
//!
//! This crate provides the `RepoCache` trait that turns a repo identity into
//! an on-disk checkout, its `git clone` implementation, and topic lookup
//! against the GitHub API for display in `sane list`.

pub mod cache;
pub mod git;
pub mod topics;

pub use cache::RepoCache;
pub use git::GitRepoCache;
pub use topics::{parse_topics, GithubTopics, NoTopics, TopicSource};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("fetch failed: {0}")]
    Fetch(#[from] sane_runtime::RuntimeError),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },
}
