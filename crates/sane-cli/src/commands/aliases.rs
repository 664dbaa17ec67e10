use super::{json_pretty, EXIT_SUCCESS};
use sane_core::Engine;

pub fn list(engine: &Engine, json: bool) -> Result<u8, String> {
    let registry = engine.registry().map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&registry.aliases)?);
    } else if registry.aliases.is_empty() {
        println!("no aliases defined");
    } else {
        for (name, target) in &registry.aliases {
            println!("{name} => {target}");
        }
    }
    Ok(EXIT_SUCCESS)
}

pub fn alias(engine: &Engine, config: &str, name: &str, json: bool) -> Result<u8, String> {
    let repo = engine.alias(config, name).map_err(|e| e.to_string())?;
    if json {
        let value = serde_json::json!({ "alias": name, "config": repo.to_string() });
        println!("{}", json_pretty(&value)?);
    } else {
        println!("aliased {repo} as {name}");
    }
    Ok(EXIT_SUCCESS)
}

pub fn dealias(engine: &Engine, config: &str, json: bool) -> Result<u8, String> {
    let removed = engine.dealias(config).map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&removed)?);
    } else if removed.is_empty() {
        println!("no aliases point at {config}");
    } else {
        println!("removed {}", removed.join(", "));
    }
    Ok(EXIT_SUCCESS)
}

pub fn clear(engine: &Engine, json: bool) -> Result<u8, String> {
    let count = engine.clear_aliases().map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&serde_json::json!({ "removed": count }))?);
    } else {
        println!("removed {count} alias(es)");
    }
    Ok(EXIT_SUCCESS)
}
