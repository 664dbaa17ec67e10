use crate::backend::{ComposeRuntime, ContainerRuntime};
use crate::RuntimeError;
use sane_schema::{ContainerSpec, ScaleEntry};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One call observed by [`MockRuntime`], in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCall {
    Run(String),
    Stop(String),
    Remove(String),
    ComposeUp { file: PathBuf, scale: Vec<String> },
}

/// Records every call and fails the ones it was told to fail.
#[derive(Default)]
pub struct MockRuntime {
    calls: Mutex<Vec<RuntimeCall>>,
    fail_run: HashSet<String>,
    fail_stop: HashSet<String>,
    fail_remove: HashSet<String>,
    fail_compose: bool,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing_run(mut self, name: &str) -> Self {
        self.fail_run.insert(name.to_owned());
        self
    }

    #[must_use]
    pub fn failing_stop(mut self, name: &str) -> Self {
        self.fail_stop.insert(name.to_owned());
        self
    }

    #[must_use]
    pub fn failing_remove(mut self, name: &str) -> Self {
        self.fail_remove.insert(name.to_owned());
        self
    }

    #[must_use]
    pub fn failing_compose(mut self) -> Self {
        self.fail_compose = true;
        self
    }

    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Names passed to `run`, in order.
    pub fn started(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RuntimeCall::Run(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RuntimeCall) -> Result<(), RuntimeError> {
        self.calls
            .lock()
            .map_err(|e| RuntimeError::ExecFailed(format!("mutex poisoned: {e}")))?
            .push(call);
        Ok(())
    }

    fn outcome(failing: &HashSet<String>, verb: &str, name: &str) -> Result<(), RuntimeError> {
        if failing.contains(name) {
            Err(RuntimeError::ExecFailed(format!("mock {verb} of '{name}' failed")))
        } else {
            Ok(())
        }
    }
}

impl ContainerRuntime for MockRuntime {
    fn name(&self) -> &str {
        "mock"
    }

    fn run(&self, spec: &ContainerSpec) -> Result<(), RuntimeError> {
        self.record(RuntimeCall::Run(spec.name.clone()))?;
        Self::outcome(&self.fail_run, "run", &spec.name)
    }

    fn stop(&self, name: &str) -> Result<(), RuntimeError> {
        self.record(RuntimeCall::Stop(name.to_owned()))?;
        Self::outcome(&self.fail_stop, "stop", name)
    }

    fn remove(&self, name: &str) -> Result<(), RuntimeError> {
        self.record(RuntimeCall::Remove(name.to_owned()))?;
        Self::outcome(&self.fail_remove, "remove", name)
    }
}

impl ComposeRuntime for MockRuntime {
    fn name(&self) -> &str {
        "mock-compose"
    }

    fn up(&self, file: &Path, scale: &[ScaleEntry]) -> Result<(), RuntimeError> {
        self.record(RuntimeCall::ComposeUp {
            file: file.to_path_buf(),
            scale: scale
                .iter()
                .map(|s| format!("{}={}", s.service, s.replicas))
                .collect(),
        })?;
        if self.fail_compose {
            return Err(RuntimeError::ExecFailed("mock compose up failed".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let mock = MockRuntime::new();
        mock.run(&ContainerSpec::new("a", "img")).unwrap();
        mock.stop("a").unwrap();
        mock.remove("a").unwrap();
        assert_eq!(
            mock.calls(),
            vec![
                RuntimeCall::Run("a".to_owned()),
                RuntimeCall::Stop("a".to_owned()),
                RuntimeCall::Remove("a".to_owned()),
            ]
        );
        assert_eq!(mock.started(), vec!["a".to_owned()]);
    }

    #[test]
    fn injected_failures_are_still_recorded() {
        let mock = MockRuntime::new().failing_run("b").failing_stop("c");
        assert!(mock.run(&ContainerSpec::new("b", "img")).is_err());
        assert!(mock.stop("c").is_err());
        assert!(mock.remove("c").is_ok());
        assert_eq!(mock.calls().len(), 3);
    }
}
