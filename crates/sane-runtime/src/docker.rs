use crate::backend::ContainerRuntime;
use crate::process::{run_command, StdioMode};
use crate::RuntimeError;
use sane_schema::ContainerSpec;
use std::process::Command;
use tracing::info;

/// Runs containers through the `docker` CLI.
pub struct DockerRuntime {
    binary: String,
}

impl Default for DockerRuntime {
    fn default() -> Self {
        Self {
            binary: "docker".to_owned(),
        }
    }
}

impl DockerRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args);
        cmd
    }
}

/// Arguments for `docker` that start `spec`, beginning with `run`.
pub fn run_args(spec: &ContainerSpec) -> Vec<String> {
    let mut args = vec!["run".to_owned()];

    if spec.daemon {
        args.push("-d".to_owned());
    }

    args.push("--name".to_owned());
    args.push(spec.name.clone());

    for (flag, value) in [("--net", &spec.net), ("--ipc", &spec.ipc), ("--pid", &spec.pid)] {
        if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
            args.push(flag.to_owned());
            args.push(v.to_owned());
        }
    }

    for port in &spec.ports {
        args.push("-p".to_owned());
        args.push(port.to_string());
    }

    for volume in &spec.volumes {
        args.push("--volume".to_owned());
        args.push(volume.to_string());
    }

    if spec.interactive {
        args.push("-it".to_owned());
    }

    for (key, value) in &spec.environment {
        args.push("--env".to_owned());
        if value.contains(' ') {
            args.push(format!("{key}=\"{value}\""));
        } else {
            args.push(format!("{key}={value}"));
        }
    }

    args.push(spec.image.clone());
    args
}

impl ContainerRuntime for DockerRuntime {
    fn name(&self) -> &str {
        "docker"
    }

    fn run(&self, spec: &ContainerSpec) -> Result<(), RuntimeError> {
        info!("starting container '{}' from {}", spec.name, spec.image);
        let mode = if spec.interactive {
            StdioMode::Inherit
        } else {
            StdioMode::Captured
        };
        run_command(&mut self.command(&run_args(spec)), mode)
    }

    fn stop(&self, name: &str) -> Result<(), RuntimeError> {
        info!("stopping container '{name}'");
        run_command(
            &mut self.command(&["stop".to_owned(), name.to_owned()]),
            StdioMode::Captured,
        )
    }

    fn remove(&self, name: &str) -> Result<(), RuntimeError> {
        run_command(
            &mut self.command(&["rm".to_owned(), name.to_owned()]),
            StdioMode::Captured,
        )
    }
}
