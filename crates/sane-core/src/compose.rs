use crate::CoreError;
use sane_runtime::ComposeRuntime;
use sane_schema::ComposeDescriptor;
use std::path::Path;
use tracing::info;

/// Bring up the compose file of `desc`, resolved against `checkout`.
///
/// Container lifecycle belongs to compose from here on: a failure is
/// reported as `ComposeFailed` and nothing is cleaned up.
pub fn start_compose(
    runtime: &dyn ComposeRuntime,
    desc: &ComposeDescriptor,
    checkout: &Path,
) -> Result<(), CoreError> {
    let file = checkout.join(&desc.file);
    info!("starting compose file {} via {}", file.display(), runtime.name());
    runtime
        .up(&file, &desc.scale)
        .map_err(|e| CoreError::ComposeFailed(e.to_string()))
}
