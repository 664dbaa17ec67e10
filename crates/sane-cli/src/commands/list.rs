use super::{json_pretty, EXIT_SUCCESS};
use sane_core::Engine;
use sane_store::{format_topics, TOPICS};

pub fn run(engine: &Engine, json: bool) -> Result<u8, String> {
    let registry = engine.registry().map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&registry.repos)?);
    } else if registry.repos.is_empty() {
        println!("no configs pulled");
    } else {
        for repo in &registry.repos {
            println!("{repo}");
            let topics = format_topics(&repo.topics);
            if !topics.is_empty() {
                println!("    {}", topics.trim_end());
            }
        }
    }
    Ok(EXIT_SUCCESS)
}

pub fn topics(json: bool) -> Result<u8, String> {
    if json {
        let map: serde_json::Map<String, serde_json::Value> = TOPICS
            .iter()
            .map(|(t, e)| ((*t).to_owned(), serde_json::Value::from(*e)))
            .collect();
        println!("{}", json_pretty(&map)?);
    } else {
        for (topic, emoji) in TOPICS {
            println!("{topic:<10} {emoji}");
        }
    }
    Ok(EXIT_SUCCESS)
}
