use crate::StoreError;
use sane_schema::{is_alias_name, null_as_default, parse_repo_string, Repo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Known repos and alias definitions, persisted as `config.json`.
///
/// Alias values are raw repo strings; they are parsed again on every use.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub repos: Vec<Repo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub aliases: BTreeMap<String, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, repo: &Repo) -> bool {
        self.position(repo).is_some()
    }

    pub fn position(&self, repo: &Repo) -> Option<usize> {
        self.repos.iter().position(|r| r == repo)
    }

    /// Record `repo`, replacing an existing entry with the same identity
    /// in place so topics are refreshed without reordering.
    pub fn register(&mut self, repo: Repo) {
        match self.position(&repo) {
            Some(i) => self.repos[i] = repo,
            None => self.repos.push(repo),
        }
    }

    /// Drop `repo` from the registry. Returns whether it was present.
    pub fn unregister(&mut self, repo: &Repo) -> bool {
        match self.position(repo) {
            Some(i) => {
                self.repos.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn set_alias(&mut self, name: impl Into<String>, raw_repo: impl Into<String>) {
        self.aliases.insert(name.into(), raw_repo.into());
    }

    pub fn remove_alias(&mut self, name: &str) -> Option<String> {
        self.aliases.remove(name)
    }

    pub fn clear_aliases(&mut self) {
        self.aliases.clear();
    }

    /// Remove every alias whose raw repo string equals `target`.
    /// Returns the removed alias names in sorted order.
    pub fn dealias(&mut self, target: &str) -> Vec<String> {
        let names: Vec<String> = self
            .aliases
            .iter()
            .filter(|(_, v)| v.as_str() == target)
            .map(|(k, _)| k.clone())
            .collect();
        for name in &names {
            self.aliases.remove(name);
        }
        debug!("removed {} alias(es) pointing at {target}", names.len());
        names
    }

    /// Resolve a command-line token to a repo identity.
    ///
    /// Tokens shaped like an alias name are looked up in the alias map and
    /// the aliased string is parsed as a repo (aliases never chain). Any
    /// other token is parsed as a repo string directly.
    pub fn resolve_token(&self, token: &str) -> Result<Repo, StoreError> {
        if is_alias_name(token) {
            let raw = self
                .aliases
                .get(token)
                .ok_or_else(|| StoreError::AliasNotFound(token.to_owned()))?;
            debug!("alias {token} -> {raw}");
            return Ok(parse_repo_string(raw)?);
        }
        Ok(parse_repo_string(token)?)
    }
}
