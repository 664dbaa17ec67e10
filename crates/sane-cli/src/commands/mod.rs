pub mod aliases;
pub mod apply;
pub mod completions;
pub mod doctor;
pub mod get;
pub mod list;
pub mod man_pages;
pub mod purge;
pub mod start;
pub mod stop;

use indicatif::{ProgressBar, ProgressStyle};
use sane_core::CommandOutcome;
use sane_schema::DescriptorMode;
use std::time::Duration;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✗ {msg}"));
}

pub fn colorize_mode(mode: DescriptorMode) -> String {
    use console::Style;
    let s = mode.as_str();
    match mode {
        DescriptorMode::Docker => Style::new().cyan().apply_to(s).to_string(),
        DescriptorMode::DockerCompose => Style::new().blue().apply_to(s).to_string(),
        DescriptorMode::Config => Style::new().green().apply_to(s).to_string(),
        DescriptorMode::Aliases => Style::new().magenta().apply_to(s).to_string(),
    }
}

/// Shared JSON shape for commands that act on one config.
pub fn outcome_json(outcome: &CommandOutcome) -> serde_json::Value {
    serde_json::json!({
        "config": outcome.repo.to_string(),
        "folder": outcome.repo.folder_name(),
        "mode": outcome.mode.map(DescriptorMode::as_str),
        "pulled": outcome.pulled,
        "items": outcome.items,
    })
}
