use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;
use thiserror::Error;

static REPO_EXP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<user>[0-9A-Za-z_]+)/(?P<name>[0-9A-Za-z_]+)((/(?P<branch>[0-9A-Za-z_/\-]+))?|(@(?P<tag>[0-9A-Za-z_.]+))?)$")
        .expect("valid repo grammar")
});

static ALIAS_EXP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9A-Za-z_\-]+$").expect("valid alias grammar")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("invalid repo format: '{0}' (expected user/name, user/name/branch or user/name@tag)")]
    InvalidRepoFormat(String),
}

/// A config bundle hosted on GitHub, optionally pinned to a branch or tag.
///
/// Equality and hashing consider `user`, `name`, `branch` and `tag` only.
/// `topics` is display data filled in after a fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Repo {
    pub user: String,
    pub name: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topics: Vec<String>,
}

/// Registry files written by older releases carry `null` for empty lists.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Repo {
    pub fn new(user: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// The branch or tag to check out, tag first.
    pub fn reference(&self) -> Option<&str> {
        if !self.tag.is_empty() {
            Some(&self.tag)
        } else if !self.branch.is_empty() {
            Some(&self.branch)
        } else {
            None
        }
    }

    /// Checkout folder name under the sane home: `user_name[_tag|_branch]`.
    pub fn folder_name(&self) -> String {
        match self.reference() {
            Some(r) => format!("{}_{}_{r}", self.user, self.name),
            None => format!("{}_{}", self.user, self.name),
        }
    }

    fn identity(&self) -> (&str, &str, &str, &str) {
        (&self.user, &self.name, &self.branch, &self.tag)
    }
}

impl PartialEq for Repo {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Repo {}

impl Hash for Repo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

/// Canonical repo string. `parse_repo_string` accepts everything this emits.
impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user, self.name)?;
        if !self.tag.is_empty() {
            write!(f, "@{}", self.tag)
        } else if !self.branch.is_empty() {
            write!(f, "/{}", self.branch)
        } else {
            Ok(())
        }
    }
}

impl std::str::FromStr for Repo {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_repo_string(s)
    }
}

pub fn parse_repo_string(input: &str) -> Result<Repo, IdentityError> {
    let caps = REPO_EXP
        .captures(input)
        .ok_or_else(|| IdentityError::InvalidRepoFormat(input.to_owned()))?;
    let group = |name: &str| {
        caps.name(name)
            .map(|m| m.as_str().to_owned())
            .unwrap_or_default()
    };

    let repo = Repo {
        user: group("user"),
        name: group("name"),
        branch: group("branch"),
        tag: group("tag"),
        topics: Vec::new(),
    };
    tracing::trace!("parsed repo string '{input}' as {repo}");
    Ok(repo)
}

/// Whether `token` has the shape of an alias name rather than a repo string.
pub fn is_alias_name(token: &str) -> bool {
    ALIAS_EXP.is_match(token)
}
