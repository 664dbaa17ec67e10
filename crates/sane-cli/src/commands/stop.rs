use super::{json_pretty, outcome_json, EXIT_SUCCESS};
use sane_core::Engine;

pub fn run(engine: &Engine, config: &str, json: bool) -> Result<u8, String> {
    let outcome = engine.stop(config).map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&outcome_json(&outcome))?);
    } else {
        for name in &outcome.items {
            println!("stopped container '{name}'");
        }
    }
    Ok(EXIT_SUCCESS)
}
