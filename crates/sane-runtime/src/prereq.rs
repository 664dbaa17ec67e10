use std::fmt;
use std::process::{Command, Stdio};

/// A missing prerequisite with actionable install instructions.
#[derive(Debug)]
pub struct MissingPrereq {
    pub name: &'static str,
    pub purpose: &'static str,
    pub install_hint: &'static str,
}

impl fmt::Display for MissingPrereq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  - {}: {} (install: {})",
            self.name, self.purpose, self.install_hint
        )
    }
}

fn succeeds(program: &str, args: &[&str]) -> bool {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

/// Check every external tool sane drives.
/// Returns a list of missing items. Empty list means all prerequisites are met.
pub fn check_prereqs() -> Vec<MissingPrereq> {
    let mut missing = Vec::new();

    if !succeeds("docker", &["-v"]) {
        missing.push(MissingPrereq {
            name: "docker",
            purpose: "running containers",
            install_hint: "https://docs.docker.com/engine/install/",
        });
    } else if !succeeds("docker", &["info"]) {
        missing.push(MissingPrereq {
            name: "docker daemon",
            purpose: "docker is installed but not reachable",
            install_hint: "start the daemon, e.g. systemctl start docker",
        });
    }

    if !succeeds("docker-compose", &["version"]) {
        missing.push(MissingPrereq {
            name: "docker-compose",
            purpose: "running docker-compose sanefiles",
            install_hint: "https://docs.docker.com/compose/install/",
        });
    }

    if !succeeds("git", &["--version"]) {
        missing.push(MissingPrereq {
            name: "git",
            purpose: "fetching config repos",
            install_hint: "apt install git | dnf install git | brew install git",
        });
    }

    missing
}

/// Format a list of missing prerequisites into a user-friendly error message.
pub fn format_missing(missing: &[MissingPrereq]) -> String {
    use std::fmt::Write as _;
    let mut msg = String::from("missing prerequisites:\n");
    for m in missing {
        let _ = writeln!(msg, "{m}");
    }
    msg.push_str("\nsane drives these tools to fetch and launch configs.");
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_prereq_display() {
        let m = MissingPrereq {
            name: "docker",
            purpose: "running containers",
            install_hint: "apt install docker.io",
        };
        let s = format!("{m}");
        assert!(s.contains("docker"));
        assert!(s.contains("running containers"));
        assert!(s.contains("apt install docker.io"));
    }

    #[test]
    fn format_missing_produces_readable_output() {
        let items = vec![
            MissingPrereq {
                name: "docker",
                purpose: "containers",
                install_hint: "apt install docker.io",
            },
            MissingPrereq {
                name: "git",
                purpose: "fetching",
                install_hint: "apt install git",
            },
        ];
        let output = format_missing(&items);
        assert!(output.starts_with("missing prerequisites:"));
        assert!(output.contains("docker"));
        assert!(output.contains("git"));
    }

    #[test]
    fn absent_program_does_not_succeed() {
        assert!(!succeeds("sane-definitely-not-installed", &[]));
        assert!(succeeds("true", &[]));
    }
}
