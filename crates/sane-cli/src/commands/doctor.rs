use super::{EXIT_FAILURE, EXIT_SUCCESS};
use sane_store::{ConfigStore, JsonConfigStore, SaneLayout};
use std::path::Path;

pub fn run(home: &Path, json_output: bool) -> Result<u8, String> {
    let mut checks: Vec<Check> = Vec::new();
    let mut all_pass = true;

    check_prereqs(&mut checks, &mut all_pass);

    let layout = SaneLayout::new(home);
    if layout.config_file().exists() {
        checks.push(Check::pass("home_exists", &format!("Sane home at {}", home.display())));
        check_registry(&layout, &mut checks, &mut all_pass);
    } else {
        checks.push(Check::info(
            "home_exists",
            "Sane home not initialized (will be created on first use)",
        ));
    }

    if std::env::var("SANE_NO_TOPICS").as_deref() == Ok("1") {
        checks.push(Check::info("topics", "Topic lookups disabled by SANE_NO_TOPICS"));
    }

    print_results(&checks, all_pass, json_output)
}

fn check_prereqs(checks: &mut Vec<Check>, all_pass: &mut bool) {
    let missing = sane_runtime::check_prereqs();
    if missing.is_empty() {
        checks.push(Check::pass(
            "prereqs",
            "docker, docker-compose and git are available",
        ));
    } else {
        *all_pass = false;
        checks.push(Check::fail(
            "prereqs",
            &sane_runtime::format_missing(&missing),
        ));
    }
}

fn check_registry(layout: &SaneLayout, checks: &mut Vec<Check>, all_pass: &mut bool) {
    let registry = match JsonConfigStore::new(layout).read() {
        Ok(r) => r,
        Err(e) => {
            *all_pass = false;
            checks.push(Check::fail("registry", &format!("Registry unreadable: {e}")));
            return;
        }
    };
    checks.push(Check::pass(
        "registry",
        &format!(
            "Registry OK ({} configs, {} aliases)",
            registry.repos.len(),
            registry.aliases.len()
        ),
    ));

    let missing: Vec<String> = registry
        .repos
        .iter()
        .filter(|r| !layout.checkout_dir(r).is_dir())
        .map(ToString::to_string)
        .collect();
    if missing.is_empty() {
        checks.push(Check::pass("checkouts", "Every registered config is on disk"));
    } else {
        checks.push(Check::warn(
            "checkouts",
            &format!(
                "Missing checkouts (pulled again on next use): {}",
                missing.join(", ")
            ),
        ));
    }

    let dangling: Vec<&str> = registry
        .aliases
        .keys()
        .filter(|name| registry.resolve_token(name).is_err())
        .map(String::as_str)
        .collect();
    if !dangling.is_empty() {
        checks.push(Check::warn(
            "aliases",
            &format!("Aliases with invalid targets: {}", dangling.join(", ")),
        ));
    }
}

fn print_results(checks: &[Check], all_pass: bool, json_output: bool) -> Result<u8, String> {
    if json_output {
        let json = serde_json::json!({
            "healthy": all_pass,
            "checks": checks.iter().map(|c| serde_json::json!({
                "name": c.name,
                "status": c.status,
                "message": c.message,
            })).collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json).map_err(|e| e.to_string())?
        );
    } else {
        println!("sane doctor\n");
        for check in checks {
            let icon = match check.status {
                "pass" => "✓",
                "fail" => "✗",
                "warn" => "⚠",
                _ => "ℹ",
            };
            println!("  {icon} {}", check.message);
        }
        println!();
        if all_pass {
            println!("All checks passed.");
        } else {
            println!("Some checks failed. See above for details.");
        }
    }
    Ok(if all_pass { EXIT_SUCCESS } else { EXIT_FAILURE })
}

struct Check {
    name: &'static str,
    status: &'static str,
    message: String,
}

impl Check {
    fn new(name: &'static str, status: &'static str, message: &str) -> Self {
        Self {
            name,
            status,
            message: message.to_owned(),
        }
    }

    fn pass(name: &'static str, message: &str) -> Self {
        Self::new(name, "pass", message)
    }

    fn fail(name: &'static str, message: &str) -> Self {
        Self::new(name, "fail", message)
    }

    fn warn(name: &'static str, message: &str) -> Self {
        Self::new(name, "warn", message)
    }

    fn info(name: &'static str, message: &str) -> Self {
        Self::new(name, "info", message)
    }
}
