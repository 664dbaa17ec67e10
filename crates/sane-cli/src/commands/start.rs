use super::{colorize_mode, json_pretty, outcome_json, EXIT_SUCCESS};
use sane_core::Engine;

pub fn run(engine: &Engine, config: &str, json: bool) -> Result<u8, String> {
    if !json {
        println!("starting {config}...");
    }
    let outcome = engine.start(config).map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&outcome_json(&outcome))?);
    } else {
        if outcome.pulled {
            println!("pulled {} first", outcome.repo);
        }
        let mode = outcome.mode.map(colorize_mode).unwrap_or_default();
        println!("started {} ({mode}): {}", outcome.repo, outcome.items.join(", "));
    }
    Ok(EXIT_SUCCESS)
}
