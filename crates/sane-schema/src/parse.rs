use crate::descriptor::{
    AliasDescriptor, ComposeDescriptor, ConfigDescriptor, ContainerSpec, Descriptor,
    DescriptorMode, DockerDescriptor, FileMapping, PathMapping, ScaleEntry, UNORDERED,
};
use crate::expand::expand_with;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name of the descriptor at the root of every checkout.
pub const SANEFILE: &str = "sane.yml";

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("sanefile not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read sanefile: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse sanefile: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("sanefile does not declare a mode")]
    ModeNotSet,
    #[error("unsupported mode '{0}' (expected docker, docker-compose, config or aliases)")]
    UnsupportedMode(String),
    #[error("image not specified for container '{0}'")]
    ImageNotSpecified(String),
    #[error("invalid {field} entry '{value}' for container '{container}', expected '<source>:<target>'")]
    InvalidMapping {
        container: String,
        field: &'static str,
        value: String,
    },
    #[error("invalid value at {path}: {reason}")]
    InvalidField { path: String, reason: String },
    #[error("missing required field: {0}")]
    MissingField(String),
    #[error("no target for '{file}' on this operating system ({os})")]
    MissingOsTarget { file: String, os: String },
}

#[derive(Debug, Deserialize)]
struct RawDocker {
    containers: IndexMap<String, RawContainer>,
}

#[derive(Debug, Deserialize)]
struct RawContainer {
    #[serde(default)]
    image: Option<String>,
    #[serde(default, alias = "daemon")]
    deamon: bool,
    #[serde(default)]
    interactive: bool,
    #[serde(default)]
    net: Option<String>,
    #[serde(default)]
    ipc: Option<String>,
    #[serde(default)]
    pid: Option<String>,
    #[serde(default)]
    ports: Vec<String>,
    #[serde(default)]
    volumes: Vec<String>,
    #[serde(default)]
    environment: Vec<IndexMap<String, Value>>,
    #[serde(default)]
    start: Option<i64>,
    #[serde(default)]
    stop: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawCompose {
    file: String,
    #[serde(default)]
    scale: Vec<IndexMap<String, u32>>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    files: Vec<IndexMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct RawAliases {
    aliases: Vec<IndexMap<String, String>>,
}

/// Keys a config-mode entry may use for the given `std::env::consts::OS`.
fn os_keys(os: &str) -> Vec<&str> {
    match os {
        "macos" | "darwin" => vec!["darwin", "macos"],
        other => vec![other],
    }
}

pub fn parse_descriptor_file(path: impl AsRef<Path>) -> Result<Descriptor, DescriptorError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(DescriptorError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    debug!("parsing sanefile {}", path.display());
    parse_descriptor_str(&content)
}

/// Parse a sanefile against the current OS and process environment.
pub fn parse_descriptor_str(input: &str) -> Result<Descriptor, DescriptorError> {
    parse_descriptor_with(input, std::env::consts::OS, |name| std::env::var(name).ok())
}

/// Parse a sanefile for `os`, expanding `$VAR` references through `lookup`.
pub fn parse_descriptor_with<F>(
    input: &str,
    os: &str,
    lookup: F,
) -> Result<Descriptor, DescriptorError>
where
    F: Fn(&str) -> Option<String>,
{
    let mode = read_mode(input)?;
    debug!("sanefile mode: {mode}");

    match mode {
        DescriptorMode::Docker => {
            let raw: RawDocker = serde_yaml::from_str(input)?;
            docker_from_raw(raw, &lookup).map(Descriptor::Docker)
        }
        DescriptorMode::DockerCompose => {
            let raw: RawCompose = serde_yaml::from_str(input)?;
            Ok(Descriptor::DockerCompose(compose_from_raw(raw)))
        }
        DescriptorMode::Config => {
            let raw: RawConfig = serde_yaml::from_str(input)?;
            config_from_raw(raw, os, &lookup).map(Descriptor::Config)
        }
        DescriptorMode::Aliases => {
            let raw: RawAliases = serde_yaml::from_str(input)?;
            Ok(Descriptor::Aliases(AliasDescriptor {
                aliases: raw.aliases.into_iter().flatten().collect(),
            }))
        }
    }
}

fn read_mode(input: &str) -> Result<DescriptorMode, DescriptorError> {
    let doc: Value = serde_yaml::from_str(input)?;
    match doc.get("mode") {
        None | Some(Value::Null) => Err(DescriptorError::ModeNotSet),
        Some(Value::String(key)) => {
            DescriptorMode::from_key(key).ok_or_else(|| DescriptorError::UnsupportedMode(key.clone()))
        }
        Some(other) => Err(DescriptorError::InvalidField {
            path: "mode".to_owned(),
            reason: format!("expected a string, found {}", describe(other)),
        }),
    }
}

fn docker_from_raw<F>(raw: RawDocker, lookup: &F) -> Result<DockerDescriptor, DescriptorError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut containers = Vec::with_capacity(raw.containers.len());

    for (name, c) in raw.containers {
        let image = c
            .image
            .ok_or_else(|| DescriptorError::ImageNotSpecified(name.clone()))?;

        let ports = c
            .ports
            .iter()
            .map(|p| split_mapping(&name, "ports", p))
            .collect::<Result<Vec<_>, _>>()?;

        let volumes = c
            .volumes
            .iter()
            .map(|v| {
                split_mapping(&name, "volumes", v).map(|m| PathMapping {
                    source: expand_with(&m.source, lookup),
                    target: m.target,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut environment = Vec::new();
        for (i, entry) in c.environment.into_iter().enumerate() {
            for (key, value) in entry {
                let value = scalar_to_string(&value).ok_or_else(|| DescriptorError::InvalidField {
                    path: format!("containers.{name}.environment[{i}].{key}"),
                    reason: format!("expected a scalar, found {}", describe(&value)),
                })?;
                environment.push((key, value));
            }
        }

        containers.push(ContainerSpec {
            name,
            daemon: c.deamon,
            interactive: c.interactive,
            net: c.net,
            ipc: c.ipc,
            pid: c.pid,
            ports,
            volumes,
            environment,
            image,
            start_order: c.start.unwrap_or(UNORDERED),
            stop_order: c.stop.unwrap_or(UNORDERED),
        });
    }

    Ok(DockerDescriptor { containers })
}

fn split_mapping(
    container: &str,
    field: &'static str,
    value: &str,
) -> Result<PathMapping, DescriptorError> {
    match value.split_once(':') {
        Some((source, target)) if !target.contains(':') => Ok(PathMapping::new(source, target)),
        _ => Err(DescriptorError::InvalidMapping {
            container: container.to_owned(),
            field,
            value: value.to_owned(),
        }),
    }
}

fn compose_from_raw(raw: RawCompose) -> ComposeDescriptor {
    ComposeDescriptor {
        file: raw.file,
        scale: raw
            .scale
            .into_iter()
            .flatten()
            .map(|(service, replicas)| ScaleEntry { service, replicas })
            .collect(),
    }
}

fn config_from_raw<F>(raw: RawConfig, os: &str, lookup: &F) -> Result<ConfigDescriptor, DescriptorError>
where
    F: Fn(&str) -> Option<String>,
{
    let keys = os_keys(os);
    let mut files = Vec::with_capacity(raw.files.len());

    for (i, entry) in raw.files.into_iter().enumerate() {
        let source = entry
            .get("file")
            .cloned()
            .ok_or_else(|| DescriptorError::MissingField(format!("files[{i}].file")))?;
        let target = keys
            .iter()
            .find_map(|k| entry.get(*k))
            .ok_or_else(|| DescriptorError::MissingOsTarget {
                file: source.clone(),
                os: os.to_owned(),
            })?;
        files.push(FileMapping {
            target: expand_with(target, lookup),
            source,
        });
    }

    Ok(ConfigDescriptor { files })
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(name: &str) -> Option<String> {
        match name {
            "HOME" => Some("/home/sane".to_owned()),
            _ => None,
        }
    }

    fn parse(input: &str) -> Result<Descriptor, DescriptorError> {
        parse_descriptor_with(input, "linux", env)
    }

    fn docker(input: &str) -> DockerDescriptor {
        match parse(input).expect("should parse") {
            Descriptor::Docker(d) => d,
            other => panic!("expected docker descriptor, got {other:?}"),
        }
    }

    #[test]
    fn parses_full_docker_descriptor() {
        let d = docker(
            r#"
mode: docker
containers:
  db:
    image: postgres:16
    deamon: true
    net: host
    ipc: host
    pid: host
    ports:
      - "5432:5432"
    volumes:
      - "$HOME/pg:/var/lib/postgresql/data"
    environment:
      - POSTGRES_PASSWORD: secret phrase
      - PGPORT: 5432
    start: 1
    stop: 2
  shell:
    image: alpine
    interactive: true
"#,
        );
        assert_eq!(d.containers.len(), 2);
        let db = &d.containers[0];
        assert_eq!(db.name, "db");
        assert_eq!(db.image, "postgres:16");
        assert!(db.daemon);
        assert_eq!(db.net.as_deref(), Some("host"));
        assert_eq!(db.ports, vec![PathMapping::new("5432", "5432")]);
        assert_eq!(
            db.volumes,
            vec![PathMapping::new("/home/sane/pg", "/var/lib/postgresql/data")]
        );
        assert_eq!(
            db.environment,
            vec![
                ("POSTGRES_PASSWORD".to_owned(), "secret phrase".to_owned()),
                ("PGPORT".to_owned(), "5432".to_owned()),
            ]
        );
        assert_eq!((db.start_order, db.stop_order), (1, 2));

        let shell = &d.containers[1];
        assert!(shell.interactive);
        assert!(!shell.daemon);
        assert_eq!(shell.start_order, UNORDERED);
        assert_eq!(shell.stop_order, UNORDERED);
    }

    #[test]
    fn keeps_declaration_order() {
        let d = docker(
            r"
mode: docker
containers:
  zeta: { image: a }
  alpha: { image: b }
  mid: { image: c }
",
        );
        let names: Vec<_> = d.containers.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn accepts_daemon_spelling() {
        let d = docker("mode: docker\ncontainers:\n  web:\n    image: nginx\n    daemon: true\n");
        assert!(d.containers[0].daemon);
    }

    #[test]
    fn missing_image_names_the_container() {
        let err = parse("mode: docker\ncontainers:\n  web:\n    deamon: true\n").unwrap_err();
        assert!(matches!(err, DescriptorError::ImageNotSpecified(ref n) if n == "web"));
    }

    #[test]
    fn rejects_malformed_port() {
        for bad in ["8080", "1:2:3"] {
            let input = format!("mode: docker\ncontainers:\n  web:\n    image: nginx\n    ports: [\"{bad}\"]\n");
            let err = parse(&input).unwrap_err();
            assert!(
                matches!(err, DescriptorError::InvalidMapping { field: "ports", .. }),
                "{bad}: {err}"
            );
        }
    }

    #[test]
    fn rejects_nested_environment_value() {
        let err = parse(
            "mode: docker\ncontainers:\n  web:\n    image: nginx\n    environment:\n      - A: [1, 2]\n",
        )
        .unwrap_err();
        match err {
            DescriptorError::InvalidField { path, .. } => {
                assert_eq!(path, "containers.web.environment[0].A");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn structural_errors_carry_the_field_path() {
        let err = parse("mode: docker\ncontainers:\n  web:\n    image: nginx\n    start: soon\n")
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("containers.web.start"), "{msg}");
    }

    #[test]
    fn missing_containers_key_fails() {
        assert!(matches!(parse("mode: docker\n"), Err(DescriptorError::Yaml(_))));
    }

    #[test]
    fn mode_is_required() {
        assert!(matches!(parse("containers: {}\n"), Err(DescriptorError::ModeNotSet)));
        assert!(matches!(parse(""), Err(DescriptorError::ModeNotSet)));
    }

    #[test]
    fn unknown_mode_fails() {
        let err = parse("mode: podman\n").unwrap_err();
        assert!(matches!(err, DescriptorError::UnsupportedMode(ref m) if m == "podman"));
        assert!(matches!(
            parse("mode: 3\n"),
            Err(DescriptorError::InvalidField { .. })
        ));
    }

    #[test]
    fn parses_compose_descriptor() {
        let d = parse(
            r"
mode: docker-compose
file: compose/docker-compose.yml
scale:
  - worker: 3
  - api: 2
",
        )
        .unwrap();
        let Descriptor::DockerCompose(c) = d else {
            panic!("expected compose descriptor");
        };
        assert_eq!(c.file, "compose/docker-compose.yml");
        assert_eq!(
            c.scale,
            vec![
                ScaleEntry {
                    service: "worker".to_owned(),
                    replicas: 3
                },
                ScaleEntry {
                    service: "api".to_owned(),
                    replicas: 2
                },
            ]
        );
    }

    #[test]
    fn compose_requires_file() {
        assert!(parse("mode: docker-compose\nscale: []\n").is_err());
    }

    #[test]
    fn config_selects_current_os_target() {
        let input = r"
mode: config
files:
  - file: vimrc
    linux: $HOME/.vimrc
    darwin: /Users/sane/.vimrc
    windows: C:\Users\sane\_vimrc
";
        let Descriptor::Config(linux) = parse_descriptor_with(input, "linux", env).unwrap() else {
            panic!("expected config descriptor");
        };
        assert_eq!(
            linux.files,
            vec![FileMapping {
                source: "vimrc".to_owned(),
                target: "/home/sane/.vimrc".to_owned()
            }]
        );

        let Descriptor::Config(mac) = parse_descriptor_with(input, "macos", env).unwrap() else {
            panic!("expected config descriptor");
        };
        assert_eq!(mac.files[0].target, "/Users/sane/.vimrc");
    }

    #[test]
    fn config_without_target_for_os_fails() {
        let err = parse("mode: config\nfiles:\n  - file: vimrc\n    windows: C:\\vimrc\n").unwrap_err();
        assert!(matches!(err, DescriptorError::MissingOsTarget { ref os, .. } if os == "linux"));
    }

    #[test]
    fn config_entry_requires_file() {
        let err = parse("mode: config\nfiles:\n  - linux: /etc/x\n").unwrap_err();
        assert!(matches!(err, DescriptorError::MissingField(ref f) if f == "files[0].file"));
    }

    #[test]
    fn parses_aliases_descriptor() {
        let d = parse("mode: aliases\naliases:\n  - redis: azer0s/redis\n  - elk: azer0s/elk@7\n")
            .unwrap();
        assert_eq!(
            d,
            Descriptor::Aliases(AliasDescriptor {
                aliases: vec![
                    ("redis".to_owned(), "azer0s/redis".to_owned()),
                    ("elk".to_owned(), "azer0s/elk@7".to_owned()),
                ]
            })
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let path = std::env::temp_dir()
            .join("sane-schema-no-such-checkout")
            .join(SANEFILE);
        let err = parse_descriptor_file(path).unwrap_err();
        assert!(matches!(err, DescriptorError::NotFound(_)));
    }
}
