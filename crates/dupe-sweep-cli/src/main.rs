mod commands;
mod logging;
mod progress;
mod prompt;

use std::env;
use std::process;

use clap::Parser;
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use dupe_sweep_core::models::bytes_to_mb;
use dupe_sweep_core::{ReconcileOutcome, SweepConfig, SweepEngine};
use progress::CliReporter;
use prompt::StdinPrompt;
use tracing::{error, info, warn};

fn main() {
    let args = Cli::parse();

    dotenv().ok();

    let _guard = logging::init_logger();

    let mut config = match dupe_sweep_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };
    if let Some(root) = args.root {
        config.root = root;
    }

    info!("Duplicate File Finder");
    if let Ok(cwd) = env::current_dir() {
        info!("Current directory: {}", cwd.display());
    }

    let result = match args.command {
        Commands::Scan => run_scan(config),
        Commands::Remove => run_remove(config),
    };

    if let Err(err) = result {
        error!("{:#}", err);
        process::exit(1);
    }
}

fn run_scan(config: SweepConfig) -> anyhow::Result<()> {
    info!("Starting duplicate file scan in {}...", config.root.display());
    let engine = SweepEngine::new(config);
    let reporter = CliReporter::new();
    let result = engine.scan(&reporter)?;

    println!();
    if result.duplicate_groups == 0 {
        info!("No duplicates found.");
    } else {
        info!(
            "Found {} sets of duplicate files ({} extra copies)",
            format!("{}", result.duplicate_groups).red(),
            format!("{}", result.duplicate_files).red(),
        );
        info!(
            "Potential space savings: {}",
            format!("{:.2} MB", bytes_to_mb(result.reclaimable_bytes)).green(),
        );
    }
    if result.warnings > 0 {
        warn!(
            "{} entries could not be read and were skipped",
            format!("{}", result.warnings).yellow(),
        );
    }
    info!("Full list saved to: {}", result.report_path.display());
    if result.duplicate_groups > 0 {
        info!("Review the list before running removal!");
    }

    Ok(())
}

fn run_remove(config: SweepConfig) -> anyhow::Result<()> {
    let engine = SweepEngine::new(config);
    let reporter = CliReporter::new();
    let mut prompt = StdinPrompt;

    println!();
    println!(
        "{}",
        "WARNING: This will remove duplicate files, keeping only the first copy of each."
            .yellow()
    );

    let summary = match engine.remove(&mut prompt, &reporter)? {
        ReconcileOutcome::Cancelled => {
            println!("Operation cancelled.");
            return Ok(());
        }
        ReconcileOutcome::Completed(summary) => summary,
    };

    println!();
    info!("Operation complete:");
    info!(
        "Kept {} original files",
        format!("{}", summary.kept).green()
    );
    info!(
        "Removed {} duplicate files",
        format!("{}", summary.removed).red()
    );
    info!(
        "Saved approximately {}",
        format!("{:.2} MB", summary.saved_mb).green()
    );
    if summary.skipped_groups > 0 {
        warn!(
            "Left {} sets untouched because their original no longer exists",
            format!("{}", summary.skipped_groups).yellow()
        );
    }
    if summary.skipped_rows > 0 {
        warn!(
            "Skipped {} malformed rows in {}",
            format!("{}", summary.skipped_rows).yellow(),
            summary.report_path.display()
        );
    }
    if summary.errors > 0 {
        warn!(
            "Encountered {} errors (see log file)",
            format!("{}", summary.errors).red()
        );
    }
    info!("Full log saved to: {}", summary.audit_log_path.display());

    Ok(())
}
