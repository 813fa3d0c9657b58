mod config;
mod logging;
mod report;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::report::Snapshot;

/// Gift Lists - budgets and alerts for shared gift lists
#[derive(Parser)]
#[command(name = "gift-lists")]
#[command(about = "Gift Lists - budgets and alerts for shared gift lists")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration and exit
    Check,
    /// Budget report for the groups in a JSON snapshot
    Report {
        /// Snapshot file with `groups`, `lists` and `items` arrays. Records
        /// breaking the data invariants are rejected.
        #[arg(long)]
        snapshot: PathBuf,

        /// Report only this group
        #[arg(long)]
        group: Option<Uuid>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) defaults -> 2) YAML (if provided) -> 3) env (GIFT_LISTS__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_verbosity(cli.verbose);
    logging::init(&config.logging)?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Check) {
        Commands::Check => {
            tracing::info!("Configuration is valid");
            println!("Configuration is valid");
            Ok(())
        }
        Commands::Report { snapshot, group } => {
            let data = Snapshot::read(&snapshot)?;
            tracing::info!(
                groups = data.groups.len(),
                lists = data.lists.len(),
                items = data.items.len(),
                "Loaded snapshot"
            );
            let reports = report::build(&data, &config.gift_lists.budget, group)?;
            println!("{}", serde_json::to_string_pretty(&reports)?);
            Ok(())
        }
    }
}
