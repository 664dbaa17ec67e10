use crate::RuntimeError;
use std::process::{Command, Stdio};
use tracing::debug;

/// How a child process is wired to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    /// No stdin, stdout discarded, stderr captured for the error message
    /// (or inherited when `SANE_DEBUG` is set).
    Captured,
    /// stdin, stdout and stderr inherited; blocks until the child exits.
    Inherit,
}

/// Whether `SANE_DEBUG` asks for child stderr on the terminal.
pub fn debug_enabled() -> bool {
    std::env::var_os("SANE_DEBUG").is_some()
}

pub(crate) fn describe(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(cmd.get_args().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}

/// Run `cmd` to completion. A non-zero exit is an error.
pub fn run_command(cmd: &mut Command, mode: StdioMode) -> Result<(), RuntimeError> {
    let line = describe(cmd);
    debug!("exec: {line}");

    let program = cmd.get_program().to_string_lossy().into_owned();
    let spawn_err = |source| RuntimeError::Spawn {
        program: program.clone(),
        source,
    };

    match mode {
        StdioMode::Inherit => {
            let status = cmd
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .map_err(spawn_err)?;
            if status.success() {
                Ok(())
            } else {
                Err(RuntimeError::ExitFailure {
                    command: line,
                    status: status.to_string(),
                    stderr: String::new(),
                })
            }
        }
        StdioMode::Captured => {
            let stderr = if debug_enabled() {
                Stdio::inherit()
            } else {
                Stdio::piped()
            };
            let output = cmd
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(stderr)
                .output()
                .map_err(spawn_err)?;
            if output.status.success() {
                Ok(())
            } else {
                Err(RuntimeError::ExitFailure {
                    command: line,
                    status: output.status.to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                })
            }
        }
    }
}
