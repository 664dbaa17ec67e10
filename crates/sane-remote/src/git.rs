use crate::cache::RepoCache;
use crate::RemoteError;
use sane_runtime::{run_command, StdioMode};
use sane_schema::Repo;
use std::path::Path;
use std::process::Command;
use tracing::info;

/// Fetches repos with `git clone` from GitHub (or another base URL).
pub struct GitRepoCache {
    git: String,
    base_url: String,
}

impl Default for GitRepoCache {
    fn default() -> Self {
        Self {
            git: "git".to_owned(),
            base_url: "https://github.com".to_owned(),
        }
    }
}

impl GitRepoCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_git(mut self, git: impl Into<String>) -> Self {
        self.git = git.into();
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    pub fn clone_url(&self, repo: &Repo) -> String {
        format!("{}/{}/{}.git", self.base_url, repo.user, repo.name)
    }

    /// Arguments for `git` that clone `repo` into `dest`.
    pub fn clone_args(&self, repo: &Repo, dest: &Path) -> Vec<String> {
        let mut args = vec!["clone".to_owned(), self.clone_url(repo)];
        if let Some(reference) = repo.reference() {
            args.push("--branch".to_owned());
            args.push(reference.to_owned());
        }
        args.push(dest.to_string_lossy().into_owned());
        args
    }
}

impl RepoCache for GitRepoCache {
    fn fetch(&self, repo: &Repo, dest: &Path) -> Result<(), RemoteError> {
        info!("cloning {repo} into {}", dest.display());
        let mut cmd = Command::new(&self.git);
        cmd.args(self.clone_args(repo, dest));
        run_command(&mut cmd, StdioMode::Captured)?;
        Ok(())
    }
}
