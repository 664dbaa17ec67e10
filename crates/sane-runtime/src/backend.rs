use crate::RuntimeError;
use sane_schema::{ContainerSpec, ScaleEntry};
use std::path::Path;

/// A container engine that can run one container per call.
///
/// Every method blocks until the underlying command finishes. Callers
/// sequence calls themselves; implementations never run in parallel.
pub trait ContainerRuntime {
    fn name(&self) -> &str;

    /// Create and start a container from `spec`. Interactive specs attach
    /// the caller's terminal and return when the container exits.
    fn run(&self, spec: &ContainerSpec) -> Result<(), RuntimeError>;

    fn stop(&self, name: &str) -> Result<(), RuntimeError>;

    fn remove(&self, name: &str) -> Result<(), RuntimeError>;
}

/// A compose tool that brings up a whole application from one file.
pub trait ComposeRuntime {
    fn name(&self) -> &str;

    /// `up` the application in the foreground with the caller's terminal.
    fn up(&self, file: &Path, scale: &[ScaleEntry]) -> Result<(), RuntimeError>;
}
