use super::{colorize_mode, json_pretty, outcome_json, EXIT_SUCCESS};
use sane_core::Engine;

/// `sane apply` when `applying`, `sane remove` otherwise.
pub fn run(engine: &Engine, config: &str, applying: bool, json: bool) -> Result<u8, String> {
    let outcome = if applying {
        engine.apply(config)
    } else {
        engine.remove(config)
    }
    .map_err(|e| e.to_string())?;

    if json {
        println!("{}", json_pretty(&outcome_json(&outcome))?);
        return Ok(EXIT_SUCCESS);
    }

    if outcome.pulled {
        println!("pulled {} first", outcome.repo);
    }
    let verb = if applying { "applied" } else { "removed" };
    let mode = outcome.mode.map(colorize_mode).unwrap_or_default();
    println!("{verb} {} ({mode})", outcome.repo);
    for item in &outcome.items {
        println!("  {item}");
    }
    Ok(EXIT_SUCCESS)
}
