use crate::StoreError;
use sane_schema::{Repo, SANEFILE};
use std::fs;
use std::path::PathBuf;
use tracing::info;

const CONFIG_FILE: &str = "config.json";
const EMPTY_REGISTRY: &str = "{\"repos\":[],\"aliases\":{}}";

/// Directory layout of the sane home.
///
/// ```text
/// <home>/config.json        registry of repos and aliases
/// <home>/<user>_<name>[_x]  one checkout per repo identity
/// ```
#[derive(Debug, Clone)]
pub struct SaneLayout {
    root: PathBuf,
}

impl SaneLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$SANE_HOME`, or `~/.sane`.
    pub fn default_root() -> Option<PathBuf> {
        if let Some(home) = std::env::var_os("SANE_HOME") {
            return Some(PathBuf::from(home));
        }
        std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".sane"))
    }

    #[inline]
    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    #[inline]
    pub fn checkout_dir(&self, repo: &Repo) -> PathBuf {
        self.root.join(repo.folder_name())
    }

    #[inline]
    pub fn sanefile(&self, repo: &Repo) -> PathBuf {
        self.checkout_dir(repo).join(SANEFILE)
    }

    /// Create the home directory and an empty registry if either is missing.
    pub fn initialize(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;
        let config = self.config_file();
        if !config.exists() {
            info!("creating empty registry at {}", config.display());
            fs::write(&config, EMPTY_REGISTRY)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_repo_identity() {
        let layout = SaneLayout::new("/home/u/.sane");
        let repo = Repo::new("azer0s", "redis").with_tag("v1");
        assert_eq!(
            layout.checkout_dir(&repo),
            PathBuf::from("/home/u/.sane/azer0s_redis_v1")
        );
        assert_eq!(
            layout.sanefile(&repo),
            PathBuf::from("/home/u/.sane/azer0s_redis_v1/sane.yml")
        );
        assert_eq!(layout.config_file(), PathBuf::from("/home/u/.sane/config.json"));
    }

    #[test]
    fn initialize_writes_empty_registry_once() {
        let dir = tempfile::tempdir().unwrap();
        let layout = SaneLayout::new(dir.path().join("home"));
        layout.initialize().unwrap();

        let content = fs::read_to_string(layout.config_file()).unwrap();
        let reg: crate::Registry = serde_json::from_str(&content).unwrap();
        assert!(reg.repos.is_empty());

        fs::write(layout.config_file(), "{\"repos\":[],\"aliases\":{\"a\":\"b/c\"}}").unwrap();
        layout.initialize().unwrap();
        let content = fs::read_to_string(layout.config_file()).unwrap();
        assert!(content.contains("b/c"), "existing registry must be kept");
    }
}
