use crate::RemoteError;
use sane_schema::Repo;
use std::fs;
use std::path::Path;
use tracing::info;

/// Resolves a repo identity to a checkout directory on disk.
pub trait RepoCache {
    /// Download `repo` into `dest`. `dest` does not exist when this is called.
    fn fetch(&self, repo: &Repo, dest: &Path) -> Result<(), RemoteError>;

    /// Fetch `repo` into `dest`, replacing any existing checkout.
    fn refetch(&self, repo: &Repo, dest: &Path) -> Result<(), RemoteError> {
        self.purge(dest)?;
        self.fetch(repo, dest)
    }

    /// Make sure a checkout of `repo` exists at `dest`. Returns whether a
    /// fetch happened.
    fn ensure(&self, repo: &Repo, dest: &Path) -> Result<bool, RemoteError> {
        if dest.is_dir() {
            return Ok(false);
        }
        self.fetch(repo, dest)?;
        Ok(true)
    }

    /// Delete the checkout at `dest`. Returns whether anything was removed.
    fn purge(&self, dest: &Path) -> Result<bool, RemoteError> {
        if !dest.exists() {
            return Ok(false);
        }
        info!("purging checkout {}", dest.display());
        fs::remove_dir_all(dest)?;
        Ok(true)
    }
}
