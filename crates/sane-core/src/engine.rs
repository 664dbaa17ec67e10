use crate::aliases::{apply_aliases, remove_aliases};
use crate::compose::start_compose;
use crate::files::{apply_files, remove_files};
use crate::orchestrator::{start_containers, stop_containers};
use crate::CoreError;
use sane_remote::{GitRepoCache, GithubTopics, RepoCache, TopicSource};
use sane_runtime::{ComposeRuntime, ContainerRuntime, DockerCompose, DockerRuntime};
use sane_schema::{is_alias_name, parse_descriptor_file, Descriptor, DescriptorMode, Repo};
use sane_store::{ConfigStore, JsonConfigStore, Registry, SaneLayout};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What a command did to one config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub repo: Repo,
    pub mode: Option<DescriptorMode>,
    /// Whether the checkout had to be fetched first.
    pub pulled: bool,
    /// Containers, file targets or alias names acted on, in order.
    pub items: Vec<String>,
}

impl CommandOutcome {
    fn new(repo: Repo, pulled: bool) -> Self {
        Self {
            repo,
            mode: None,
            pulled,
            items: Vec::new(),
        }
    }
}

/// Entry point for every sane command.
///
/// Each public method is one command: it reads the registry once, works in
/// memory, and writes the registry back at most once.
pub struct Engine {
    layout: SaneLayout,
    store: Arc<dyn ConfigStore>,
    cache: Arc<dyn RepoCache>,
    topics: Arc<dyn TopicSource>,
    containers: Arc<dyn ContainerRuntime>,
    compose: Arc<dyn ComposeRuntime>,
}

impl Engine {
    /// Engine over the sane home at `home`, using git, the GitHub API,
    /// docker and docker-compose.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let layout = SaneLayout::new(home);
        let store = Arc::new(JsonConfigStore::new(&layout));
        Self {
            layout,
            store,
            cache: Arc::new(GitRepoCache::new()),
            topics: Arc::new(GithubTopics::default()),
            containers: Arc::new(DockerRuntime::new()),
            compose: Arc::new(DockerCompose::new()),
        }
    }

    #[must_use]
    pub fn with_config_store(mut self, store: Arc<dyn ConfigStore>) -> Self {
        self.store = store;
        self
    }

    #[must_use]
    pub fn with_repo_cache(mut self, cache: Arc<dyn RepoCache>) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn with_topic_source(mut self, topics: Arc<dyn TopicSource>) -> Self {
        self.topics = topics;
        self
    }

    #[must_use]
    pub fn with_container_runtime(mut self, runtime: Arc<dyn ContainerRuntime>) -> Self {
        self.containers = runtime;
        self
    }

    #[must_use]
    pub fn with_compose_runtime(mut self, runtime: Arc<dyn ComposeRuntime>) -> Self {
        self.compose = runtime;
        self
    }

    pub fn layout(&self) -> &SaneLayout {
        &self.layout
    }

    /// Load the registry, creating the sane home on first use.
    pub fn registry(&self) -> Result<Registry, CoreError> {
        self.layout.initialize()?;
        Ok(self.store.read()?)
    }

    fn save(&self, registry: &Registry) -> Result<(), CoreError> {
        self.store.write(registry)?;
        Ok(())
    }

    pub fn resolve(&self, token: &str) -> Result<Repo, CoreError> {
        Ok(self.registry()?.resolve_token(token)?)
    }

    fn lookup_topics(&self, repo: &Repo) -> Vec<String> {
        match self.topics.topics(repo) {
            Ok(topics) => topics,
            Err(e) => {
                warn!("topic lookup for {repo} failed: {e}");
                Vec::new()
            }
        }
    }

    /// Fetch a fresh checkout of `repo` and (re-)register it with its topics.
    fn pull(&self, registry: &mut Registry, repo: &Repo) -> Result<PathBuf, CoreError> {
        let dest = self.layout.checkout_dir(repo);
        registry.unregister(repo);
        self.cache.refetch(repo, &dest)?;

        let mut entry = repo.clone();
        entry.topics = self.lookup_topics(repo);
        info!("registering {repo} ({} topic(s))", entry.topics.len());
        registry.register(entry);
        Ok(dest)
    }

    /// Pull an unregistered `repo`; fetch a registered one only if its
    /// checkout is gone. Returns whether anything was fetched.
    fn auto_pull(&self, registry: &mut Registry, repo: &Repo) -> Result<bool, CoreError> {
        if !registry.contains(repo) {
            info!("config {repo} missing, pulling automatically");
            self.pull(registry, repo)?;
            return Ok(true);
        }
        let fetched = self.cache.ensure(repo, &self.layout.checkout_dir(repo))?;
        if fetched {
            info!("checkout of {repo} was missing, fetched it again");
        }
        Ok(fetched)
    }

    /// Parse the sanefile of a checkout. Always read fresh from disk.
    pub fn descriptor(&self, repo: &Repo) -> Result<Descriptor, CoreError> {
        let path = self.layout.sanefile(repo);
        debug!("reading {}", path.display());
        Ok(parse_descriptor_file(&path)?)
    }

    /// `sane get`: clone (or re-clone) a config and register it.
    pub fn get(&self, token: &str) -> Result<CommandOutcome, CoreError> {
        let mut registry = self.registry()?;
        let repo = registry.resolve_token(token)?;
        let dest = self.pull(&mut registry, &repo)?;
        self.save(&registry)?;

        let mut outcome = CommandOutcome::new(repo, true);
        outcome.items.push(dest.display().to_string());
        Ok(outcome)
    }

    /// `sane purge`: delete a checkout and forget the config.
    pub fn purge(&self, token: &str) -> Result<CommandOutcome, CoreError> {
        let mut registry = self.registry()?;
        let repo = registry.resolve_token(token)?;
        let dest = self.layout.checkout_dir(&repo);

        let deleted = self.cache.purge(&dest)?;
        let forgotten = registry.unregister(&repo);
        if forgotten {
            self.save(&registry)?;
        }
        debug!("purge {repo}: checkout deleted={deleted}, unregistered={forgotten}");

        let mut outcome = CommandOutcome::new(repo, false);
        if deleted {
            outcome.items.push(dest.display().to_string());
        }
        Ok(outcome)
    }

    /// `sane start`: run a docker or docker-compose config, pulling it first
    /// if needed.
    pub fn start(&self, token: &str) -> Result<CommandOutcome, CoreError> {
        let mut registry = self.registry()?;
        let repo = registry.resolve_token(token)?;
        let pulled = self.auto_pull(&mut registry, &repo)?;
        if pulled {
            self.save(&registry)?;
        }

        let descriptor = self.descriptor(&repo)?;
        let mut outcome = CommandOutcome::new(repo, pulled);
        outcome.mode = Some(descriptor.mode());
        match descriptor {
            Descriptor::Docker(desc) => {
                outcome.items = start_containers(self.containers.as_ref(), &desc)?;
            }
            Descriptor::DockerCompose(desc) => {
                let checkout = self.layout.checkout_dir(&outcome.repo);
                start_compose(self.compose.as_ref(), &desc, &checkout)?;
                outcome.items.push(desc.file);
            }
            other => return Err(unsupported(&other, "start")),
        }
        Ok(outcome)
    }

    /// `sane stop`: stop and remove the containers of a docker config.
    pub fn stop(&self, token: &str) -> Result<CommandOutcome, CoreError> {
        let repo = self.resolve(token)?;
        let descriptor = self.descriptor(&repo)?;
        let mut outcome = CommandOutcome::new(repo, false);
        outcome.mode = Some(descriptor.mode());
        match descriptor {
            Descriptor::Docker(desc) => {
                outcome.items = stop_containers(self.containers.as_ref(), &desc)?;
            }
            other => return Err(unsupported(&other, "stop")),
        }
        Ok(outcome)
    }

    /// `sane apply`: install a config's files or aliases.
    pub fn apply(&self, token: &str) -> Result<CommandOutcome, CoreError> {
        self.transact(token, "apply")
    }

    /// `sane remove`: undo `apply`.
    pub fn remove(&self, token: &str) -> Result<CommandOutcome, CoreError> {
        self.transact(token, "remove")
    }

    fn transact(&self, token: &str, operation: &'static str) -> Result<CommandOutcome, CoreError> {
        let applying = operation == "apply";
        let mut registry = self.registry()?;
        let repo = registry.resolve_token(token)?;
        let pulled = self.auto_pull(&mut registry, &repo)?;

        let descriptor = match self.descriptor(&repo) {
            Ok(d) => d,
            Err(e) => {
                if pulled {
                    self.save(&registry)?;
                }
                return Err(e);
            }
        };

        let mut outcome = CommandOutcome::new(repo, pulled);
        outcome.mode = Some(descriptor.mode());
        let mut dirty = pulled;
        let result = match descriptor {
            Descriptor::Config(desc) => {
                outcome.items = desc.files.iter().map(|f| f.target.clone()).collect();
                if applying {
                    apply_files(&desc, &self.layout.checkout_dir(&outcome.repo))
                } else {
                    remove_files(&desc)
                }
            }
            Descriptor::Aliases(desc) => {
                outcome.items = if applying {
                    apply_aliases(&desc, &mut registry)
                } else {
                    remove_aliases(&desc, &mut registry);
                    desc.aliases.iter().map(|(n, _)| n.clone()).collect()
                };
                dirty = true;
                Ok(())
            }
            other => Err(unsupported(&other, operation)),
        };

        if dirty {
            self.save(&registry)?;
        }
        result.map(|()| outcome)
    }

    /// `sane alias <config> <name>`: point `name` at a config.
    ///
    /// The alias stores the canonical repo string, so aliasing through
    /// another alias records what that alias currently resolves to.
    pub fn alias(&self, token: &str, name: &str) -> Result<Repo, CoreError> {
        if !is_alias_name(name) {
            return Err(CoreError::InvalidAliasName(name.to_owned()));
        }
        let mut registry = self.registry()?;
        let repo = registry.resolve_token(token)?;
        registry.set_alias(name, repo.to_string());
        self.save(&registry)?;
        info!("aliased {repo} as {name}");
        Ok(repo)
    }

    /// `sane dealias <config>`: remove every alias pointing at a config.
    pub fn dealias(&self, token: &str) -> Result<Vec<String>, CoreError> {
        let mut registry = self.registry()?;
        let repo = registry.resolve_token(token)?;
        let removed = registry.dealias(&repo.to_string());
        if !removed.is_empty() {
            self.save(&registry)?;
        }
        Ok(removed)
    }

    /// `sane rmaliases`: drop every alias. Returns how many there were.
    pub fn clear_aliases(&self) -> Result<usize, CoreError> {
        let mut registry = self.registry()?;
        let count = registry.aliases.len();
        registry.clear_aliases();
        self.save(&registry)?;
        Ok(count)
    }
}

fn unsupported(descriptor: &Descriptor, operation: &'static str) -> CoreError {
    CoreError::UnsupportedOperation {
        mode: descriptor.mode(),
        operation,
    }
}
