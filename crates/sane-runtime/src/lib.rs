//! Container runtime backends for sane.
//!
//! This crate implements the execution layer: the `ContainerRuntime` trait
//! (run / stop / remove one container) with a Docker CLI backend and a
//! recording mock, the `ComposeRuntime` trait with a docker-compose backend,
//! synchronous subprocess helpers, and prerequisite checking.

pub mod backend;
pub mod compose;
pub mod docker;
pub mod mock;
pub mod prereq;
pub mod process;

pub use backend::{ComposeRuntime, ContainerRuntime};
pub use compose::{compose_args, DockerCompose};
pub use docker::{run_args, DockerRuntime};
pub use mock::{MockRuntime, RuntimeCall};
pub use prereq::{check_prereqs, format_missing, MissingPrereq};
pub use process::{debug_enabled, run_command, StdioMode};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{command}' exited with {status}{}", stderr_suffix(.stderr))]
    ExitFailure {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("runtime execution failed: {0}")]
    ExecFailed(String),
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_failure_display_includes_stderr() {
        let e = RuntimeError::ExitFailure {
            command: "docker run nginx".to_owned(),
            status: "exit status: 125".to_owned(),
            stderr: "Conflict. The container name is already in use\n".to_owned(),
        };
        assert_eq!(
            e.to_string(),
            "'docker run nginx' exited with exit status: 125: Conflict. The container name is already in use"
        );
    }

    #[test]
    fn exit_failure_display_without_stderr() {
        let e = RuntimeError::ExitFailure {
            command: "docker stop web".to_owned(),
            status: "exit status: 1".to_owned(),
            stderr: String::new(),
        };
        assert_eq!(e.to_string(), "'docker stop web' exited with exit status: 1");
    }
}
