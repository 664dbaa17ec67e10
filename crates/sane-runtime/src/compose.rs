use crate::backend::ComposeRuntime;
use crate::process::{run_command, StdioMode};
use crate::RuntimeError;
use sane_schema::ScaleEntry;
use std::path::Path;
use std::process::Command;
use tracing::info;

/// Runs applications through the `docker-compose` CLI.
pub struct DockerCompose {
    binary: String,
}

impl Default for DockerCompose {
    fn default() -> Self {
        Self {
            binary: "docker-compose".to_owned(),
        }
    }
}

impl DockerCompose {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

/// `-f <file> up` followed by one `--scale service=n` per entry, in order.
pub fn compose_args(file: &Path, scale: &[ScaleEntry]) -> Vec<String> {
    let mut args = vec![
        "-f".to_owned(),
        file.to_string_lossy().into_owned(),
        "up".to_owned(),
    ];
    for entry in scale {
        args.push("--scale".to_owned());
        args.push(format!("{}={}", entry.service, entry.replicas));
    }
    args
}

impl ComposeRuntime for DockerCompose {
    fn name(&self) -> &str {
        "docker-compose"
    }

    fn up(&self, file: &Path, scale: &[ScaleEntry]) -> Result<(), RuntimeError> {
        info!("bringing up {}", file.display());
        let mut cmd = Command::new(&self.binary);
        cmd.args(compose_args(file, scale));
        run_command(&mut cmd, StdioMode::Inherit)
    }
}
