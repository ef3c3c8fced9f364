//! Turn-Based Strategy Engine - Development Tools

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tbs_core::loader::load_scenario;
use tbs_core::random::SeededDice;
use tbs_tools::error::Result;
use tbs_tools::report;
use tbs_tools::validate;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tbs-tools")]
#[command(about = "Development tools for turn-based strategy scenarios")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a scenario file, or every scenario in a directory, and report problems
    Validate {
        /// Scenario file or directory
        path: PathBuf,
    },
    /// List built attachments and the option values applied to them
    Attachments {
        /// Scenario file
        path: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Evaluate every condition and user action of a player
    Conditions {
        /// Scenario file
        path: PathBuf,
        /// Player name
        #[arg(short, long)]
        player: String,
        /// Dice seed for chance rolls
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Collect a player's national objective income for one turn
    Objectives {
        /// Scenario file
        path: PathBuf,
        /// Player name
        #[arg(short, long)]
        player: String,
        /// Dice seed for chance rolls
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(cli.command) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Validate { path } => validate_path(&path),
        Commands::Attachments { path, json } => {
            let data = load_scenario(&path)?;
            let entries = report::attachment_entries(&data);
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print!("{}", report::render_attachments(&entries));
            }
            Ok(())
        }
        Commands::Conditions {
            path,
            player,
            seed,
            json,
        } => {
            let data = load_scenario(&path)?;
            let player = report::find_player(&data, &player)?;
            let entries = report::condition_entries(&data, player, SeededDice::new(seed))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print!("{}", report::render_conditions(&entries));
            }
            Ok(())
        }
        Commands::Objectives {
            path,
            player,
            seed,
            json,
        } => {
            let mut data = load_scenario(&path)?;
            let player = report::find_player(&data, &player)?;
            let income = report::objective_report(&mut data, player, SeededDice::new(seed))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&income)?);
            } else {
                print!("{}", report::render_objectives(&income));
            }
            Ok(())
        }
    }
}

fn validate_path(path: &Path) -> Result<()> {
    if !path.is_dir() {
        let summary = validate::validate_scenario(path)?;
        tracing::info!(
            "Validation passed: '{}' ({} attachments, {} conditions, {} objectives)",
            summary.scenario,
            summary.attachments,
            summary.conditions,
            summary.objectives
        );
        return Ok(());
    }

    tracing::info!("Validating scenarios in: {}", path.display());
    let results = match validate::validate_directory(path) {
        Ok(results) => results,
        Err(e) => {
            tracing::error!("Cannot read {}: {e}", path.display());
            std::process::exit(1);
        }
    };
    let failed = results.iter().filter(|(_, result)| result.is_err()).count();
    for (file, result) in &results {
        match result {
            Ok(summary) => tracing::info!("{}: ok ({})", file.display(), summary.scenario),
            Err(e) => tracing::error!("{}: {e}", file.display()),
        }
    }
    if failed > 0 {
        tracing::error!("{failed} of {} scenarios failed validation", results.len());
        std::process::exit(1);
    }
    tracing::info!("Validation passed");
    Ok(())
}
