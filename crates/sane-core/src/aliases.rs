use sane_schema::{is_alias_name, AliasDescriptor};
use sane_store::Registry;
use tracing::{debug, warn};

/// Add every alias of `desc` to `registry`, overwriting existing names.
///
/// Names that would parse as repo strings can never be resolved, so they are
/// skipped. Returns the names that were set.
pub fn apply_aliases(desc: &AliasDescriptor, registry: &mut Registry) -> Vec<String> {
    let mut applied = Vec::with_capacity(desc.aliases.len());
    for (name, raw) in &desc.aliases {
        if !is_alias_name(name) {
            warn!("skipping alias '{name}': not a valid alias name");
            continue;
        }
        debug!("alias {name} -> {raw}");
        registry.set_alias(name.as_str(), raw.as_str());
        applied.push(name.clone());
    }
    applied
}

/// Remove every alias name listed in `desc` from `registry`.
pub fn remove_aliases(desc: &AliasDescriptor, registry: &mut Registry) {
    for (name, _) in &desc.aliases {
        if registry.remove_alias(name).is_some() {
            debug!("removed alias {name}");
        }
    }
}
