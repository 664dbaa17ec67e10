use super::{json_pretty, outcome_json, EXIT_SUCCESS};
use sane_core::Engine;

pub fn run(engine: &Engine, config: &str, json: bool) -> Result<u8, String> {
    let outcome = engine.purge(config).map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&outcome_json(&outcome))?);
    } else if outcome.items.is_empty() {
        println!("{} was not pulled; nothing to purge", outcome.repo);
    } else {
        println!("purged {}", outcome.repo);
    }
    Ok(EXIT_SUCCESS)
}
