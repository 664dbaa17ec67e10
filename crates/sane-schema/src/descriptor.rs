use serde::Serialize;
use std::fmt;

/// Order value of a container that declares no `start`/`stop` key.
/// Sorts after every explicitly ordered container.
pub const UNORDERED: i64 = i64::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DescriptorMode {
    Docker,
    DockerCompose,
    Config,
    Aliases,
}

impl DescriptorMode {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "docker" => Some(Self::Docker),
            "docker-compose" => Some(Self::DockerCompose),
            "config" => Some(Self::Config),
            "aliases" => Some(Self::Aliases),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::DockerCompose => "docker-compose",
            Self::Config => "config",
            Self::Aliases => "aliases",
        }
    }
}

impl fmt::Display for DescriptorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed sanefile. Each mode carries only the fields valid for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    Docker(DockerDescriptor),
    DockerCompose(ComposeDescriptor),
    Config(ConfigDescriptor),
    Aliases(AliasDescriptor),
}

impl Descriptor {
    pub fn mode(&self) -> DescriptorMode {
        match self {
            Self::Docker(_) => DescriptorMode::Docker,
            Self::DockerCompose(_) => DescriptorMode::DockerCompose,
            Self::Config(_) => DescriptorMode::Config,
            Self::Aliases(_) => DescriptorMode::Aliases,
        }
    }
}

/// `source:target` pair as written in `ports` / `volumes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathMapping {
    pub source: String,
    pub target: String,
}

impl PathMapping {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for PathMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSpec {
    pub name: String,
    pub daemon: bool,
    pub interactive: bool,
    pub net: Option<String>,
    pub ipc: Option<String>,
    pub pid: Option<String>,
    pub ports: Vec<PathMapping>,
    /// Sources are already environment-expanded.
    pub volumes: Vec<PathMapping>,
    pub environment: Vec<(String, String)>,
    pub image: String,
    pub start_order: i64,
    pub stop_order: i64,
}

impl ContainerSpec {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            daemon: false,
            interactive: false,
            net: None,
            ipc: None,
            pid: None,
            ports: Vec::new(),
            volumes: Vec::new(),
            environment: Vec::new(),
            image: image.into(),
            start_order: UNORDERED,
            stop_order: UNORDERED,
        }
    }
}

/// Containers in sanefile declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DockerDescriptor {
    pub containers: Vec<ContainerSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleEntry {
    pub service: String,
    pub replicas: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeDescriptor {
    /// Compose file path relative to the checkout.
    pub file: String,
    pub scale: Vec<ScaleEntry>,
}

/// A config file to swap into place, already narrowed to the current OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMapping {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDescriptor {
    pub files: Vec<FileMapping>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasDescriptor {
    /// `(alias name, raw repo string)` in declaration order.
    pub aliases: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_keys_roundtrip() {
        for mode in [
            DescriptorMode::Docker,
            DescriptorMode::DockerCompose,
            DescriptorMode::Config,
            DescriptorMode::Aliases,
        ] {
            assert_eq!(DescriptorMode::from_key(mode.as_str()), Some(mode));
        }
        assert_eq!(DescriptorMode::from_key("podman"), None);
        assert_eq!(DescriptorMode::from_key("Docker"), None);
    }

    #[test]
    fn new_container_is_unordered() {
        let spec = ContainerSpec::new("web", "nginx");
        assert_eq!(spec.start_order, UNORDERED);
        assert_eq!(spec.stop_order, UNORDERED);
        assert!(!spec.daemon);
    }

    #[test]
    fn descriptor_reports_mode() {
        let d = Descriptor::Config(ConfigDescriptor::default());
        assert_eq!(d.mode(), DescriptorMode::Config);
        assert_eq!(d.mode().to_string(), "config");
    }
}
