use crate::CoreError;
use sane_runtime::ContainerRuntime;
use sane_schema::{ContainerSpec, DockerDescriptor};
use tracing::{debug, info, warn};

/// Containers in the order `start` runs them: ascending `start_order`,
/// ties kept in descriptor order.
pub fn start_sequence(desc: &DockerDescriptor) -> Vec<&ContainerSpec> {
    let mut specs: Vec<&ContainerSpec> = desc.containers.iter().collect();
    specs.sort_by_key(|c| c.start_order);
    specs
}

/// Containers in the order `stop` tears them down: ascending `stop_order`,
/// ties kept in descriptor order.
pub fn stop_sequence(desc: &DockerDescriptor) -> Vec<&ContainerSpec> {
    let mut specs: Vec<&ContainerSpec> = desc.containers.iter().collect();
    specs.sort_by_key(|c| c.stop_order);
    specs
}

/// Start every container of `desc`, one at a time.
///
/// If a container fails to start, every container started before it is
/// stopped and removed (in start order) and the call returns
/// `ContainerStartFailed`. Rollback is advisory: its own failures do not
/// abort it and are returned as warnings on the error.
pub fn start_containers(
    runtime: &dyn ContainerRuntime,
    desc: &DockerDescriptor,
) -> Result<Vec<String>, CoreError> {
    let mut started: Vec<String> = Vec::new();

    for spec in start_sequence(desc) {
        info!("starting container '{}' ({})", spec.name, spec.image);
        if let Err(e) = runtime.run(spec) {
            warn!("container '{}' failed to start, rolling back", spec.name);
            let rollback_warnings = roll_back(runtime, &started);
            return Err(CoreError::ContainerStartFailed {
                name: spec.name.clone(),
                reason: e.to_string(),
                rollback_warnings,
            });
        }
        started.push(spec.name.clone());
    }

    debug!("started {} container(s) via {}", started.len(), runtime.name());
    Ok(started)
}

fn roll_back(runtime: &dyn ContainerRuntime, started: &[String]) -> Vec<String> {
    let mut warnings = Vec::new();
    for name in started {
        debug!("rollback: stopping '{name}'");
        if let Err(e) = runtime.stop(name) {
            warn!("rollback: stop of '{name}' failed: {e}");
            warnings.push(format!("stop {name}: {e}"));
        }
        debug!("rollback: removing '{name}'");
        if let Err(e) = runtime.remove(name) {
            warn!("rollback: removal of '{name}' failed: {e}");
            warnings.push(format!("rm {name}: {e}"));
        }
    }
    warnings
}

/// Stop and remove every container of `desc`.
///
/// Stops at the first container whose stop or removal fails; containers
/// later in the order are left untouched so a re-run can pick them up.
pub fn stop_containers(
    runtime: &dyn ContainerRuntime,
    desc: &DockerDescriptor,
) -> Result<Vec<String>, CoreError> {
    let mut stopped = Vec::new();

    for spec in stop_sequence(desc) {
        info!("stopping container '{}'", spec.name);
        // Removal is still attempted after a failed stop; the container is
        // reported as failed if either step fails.
        let stop = runtime.stop(&spec.name);
        let remove = runtime.remove(&spec.name);
        if let Err(e) = stop.and(remove) {
            return Err(CoreError::ContainerStopFailed {
                name: spec.name.clone(),
                reason: e.to_string(),
            });
        }
        stopped.push(spec.name.clone());
    }

    Ok(stopped)
}
