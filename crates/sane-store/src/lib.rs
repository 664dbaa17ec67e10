//! Registry and on-disk state for sane.
//!
//! This crate provides the storage layer: the `Registry` of known repos and
//! aliases (with alias resolution and reverse-lookup removal), the
//! `ConfigStore` trait with its atomic JSON implementation, `SaneLayout` for
//! the home directory structure, and the topic display table.

pub mod config;
pub mod layout;
pub mod registry;
pub mod topics;

pub use config::{ConfigStore, JsonConfigStore, MemoryConfigStore};
pub use layout::SaneLayout;
pub use registry::Registry;
pub use topics::{format_topics, topic_emoji, TOPICS};

use std::path::Path;
use thiserror::Error;

/// Fsync a directory so a preceding rename inside it is durable.
pub(crate) fn fsync_dir(dir: &Path) -> Result<(), std::io::Error> {
    let f = std::fs::File::open(dir)?;
    f.sync_all()
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file {path}: {source}")]
    Serialization {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("config file not found: {0}")]
    ConfigMissing(String),
    #[error("alias '{0}' not found")]
    AliasNotFound(String),
    #[error(transparent)]
    Identity(#[from] sane_schema::IdentityError),
}
