//! Core orchestration for sane.
//!
//! This crate ties together repo identity, the registry, checkout fetching
//! and the runtime backends into the `Engine`, the API behind every `sane`
//! command. It also holds the container orchestrator (ordered start with
//! rollback, fail-fast stop), the compose delegate, and the file
//! transaction engine used by config-mode sanefiles.

pub mod aliases;
pub mod compose;
pub mod engine;
pub mod files;
pub mod orchestrator;

pub use aliases::{apply_aliases, remove_aliases};
pub use compose::start_compose;
pub use engine::{CommandOutcome, Engine};
pub use files::{apply_files, backup_path, remove_files};
pub use orchestrator::{start_containers, start_sequence, stop_containers, stop_sequence};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("sanefile error: {0}")]
    Descriptor(#[from] sane_schema::DescriptorError),
    #[error("store error: {0}")]
    Store(#[from] sane_store::StoreError),
    #[error("runtime error: {0}")]
    Runtime(#[from] sane_runtime::RuntimeError),
    #[error("remote error: {0}")]
    Remote(#[from] sane_remote::RemoteError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to start container '{name}': {reason}{}", warnings_suffix(.rollback_warnings))]
    ContainerStartFailed {
        name: String,
        reason: String,
        rollback_warnings: Vec<String>,
    },
    #[error("failed to stop container '{name}': {reason}")]
    ContainerStopFailed { name: String, reason: String },
    #[error("docker-compose failed: {0}")]
    ComposeFailed(String),
    #[error("file operation on {path} failed: {reason}")]
    FileTransactionFailed { path: String, reason: String },
    #[error("invalid alias name '{0}': use letters, digits, '_' and '-' only")]
    InvalidAliasName(String),
    #[error("'{operation}' is not supported for {mode} sanefiles")]
    UnsupportedOperation {
        mode: sane_schema::DescriptorMode,
        operation: &'static str,
    },
}

fn warnings_suffix(warnings: &[String]) -> String {
    if warnings.is_empty() {
        String::new()
    } else {
        format!(" (rollback incomplete: {})", warnings.join("; "))
    }
}
