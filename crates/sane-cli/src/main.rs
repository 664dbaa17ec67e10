mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::EXIT_FAILURE;
use sane_core::Engine;
use sane_remote::NoTopics;
use sane_store::SaneLayout;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(
    name = "sane",
    version,
    about = "Pull configs from GitHub and start, stop, apply or remove them"
)]
struct Cli {
    /// Path to the sane home directory [default: $SANE_HOME or ~/.sane].
    #[arg(long, global = true)]
    home: Option<String>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Pull a config from GitHub (re-pulls if already present).
    Get {
        /// Repo string (user/name[/branch][@tag]) or alias.
        config: String,
    },
    /// Delete a pulled config from disk and forget it.
    Purge {
        /// Repo string or alias.
        config: String,
    },
    /// Start the containers or compose file described by a sanefile.
    Start {
        /// Repo string or alias.
        config: String,
    },
    /// Stop and remove the containers described by a sanefile.
    Stop {
        /// Repo string or alias.
        config: String,
    },
    /// Apply the files or aliases described by a sanefile.
    Apply {
        /// Repo string or alias.
        config: String,
    },
    /// Undo `apply`: restore backed-up files or drop the aliases.
    Remove {
        /// Repo string or alias.
        config: String,
    },
    /// List pulled configs.
    List,
    /// List the topics `list` knows how to display.
    ListTopics,
    /// List all aliases.
    Aliases,
    /// Alias a config.
    Alias {
        /// Repo string or alias to point at.
        config: String,
        /// Alias name (letters, digits, '_' and '-').
        name: String,
    },
    /// Remove all aliases.
    Rmaliases,
    /// Remove every alias pointing at a config.
    Dealias {
        /// Repo string or alias.
        config: String,
    },
    /// Check that docker, docker-compose and git are usable.
    Doctor,
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose || sane_runtime::debug_enabled() {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("SANE_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let Some(home) = cli
        .home
        .as_deref()
        .map(expand_tilde)
        .or_else(SaneLayout::default_root)
    else {
        eprintln!("error: cannot locate the sane home; set $HOME, $SANE_HOME or pass --home");
        return ExitCode::from(EXIT_FAILURE);
    };

    let mut engine = Engine::new(&home);
    if std::env::var("SANE_NO_TOPICS").as_deref() == Ok("1") {
        engine = engine.with_topic_source(Arc::new(NoTopics));
    }
    let json_output = cli.json;

    let needs_tools = matches!(
        cli.command,
        Commands::Get { .. }
            | Commands::Start { .. }
            | Commands::Stop { .. }
            | Commands::Apply { .. }
            | Commands::Remove { .. }
    );
    if needs_tools && std::env::var("SANE_SKIP_PREREQS").as_deref() != Ok("1") {
        let missing = sane_runtime::check_prereqs();
        if !missing.is_empty() {
            eprintln!("error: {}", sane_runtime::format_missing(&missing));
            return ExitCode::from(EXIT_FAILURE);
        }
    }

    let result = match cli.command {
        Commands::Get { config } => commands::get::run(&engine, &config, json_output),
        Commands::Purge { config } => commands::purge::run(&engine, &config, json_output),
        Commands::Start { config } => commands::start::run(&engine, &config, json_output),
        Commands::Stop { config } => commands::stop::run(&engine, &config, json_output),
        Commands::Apply { config } => commands::apply::run(&engine, &config, true, json_output),
        Commands::Remove { config } => commands::apply::run(&engine, &config, false, json_output),
        Commands::List => commands::list::run(&engine, json_output),
        Commands::ListTopics => commands::list::topics(json_output),
        Commands::Aliases => commands::aliases::list(&engine, json_output),
        Commands::Alias { config, name } => {
            commands::aliases::alias(&engine, &config, &name, json_output)
        }
        Commands::Rmaliases => commands::aliases::clear(&engine, json_output),
        Commands::Dealias { config } => commands::aliases::dealias(&engine, &config, json_output),
        Commands::Doctor => commands::doctor::run(&home, json_output),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    PathBuf::from(path)
}
