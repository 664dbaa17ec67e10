use super::{json_pretty, outcome_json, spin_fail, spin_ok, spinner, EXIT_SUCCESS};
use sane_core::Engine;

pub fn run(engine: &Engine, config: &str, json: bool) -> Result<u8, String> {
    let pb = (!json).then(|| spinner(&format!("pulling {config}...")));
    match engine.get(config) {
        Ok(outcome) => {
            if let Some(pb) = &pb {
                spin_ok(pb, &format!("{} ready to use", outcome.repo));
            }
            if json {
                println!("{}", json_pretty(&outcome_json(&outcome))?);
            }
            Ok(EXIT_SUCCESS)
        }
        Err(e) => {
            if let Some(pb) = &pb {
                spin_fail(pb, &format!("could not pull {config}"));
            }
            Err(e.to_string())
        }
    }
}
