//! contentsync CLI
//!
//! Mirrors Contentful entries into the content collections of a static
//! site pod.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use contentsync_core::SyncOptions;

use cli::{Cli, Commands};
use context::Pod;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let Some(command) = cli.command else {
        println!("{} Contentful to collections sync", "contentsync".green().bold());
        println!();
        println!("Run {} for available commands.", "contentsync --help".cyan());
        return Ok(());
    };

    let pod = Pod::load(cli.pod.as_deref(), cli.access_token.as_deref())?;
    match command {
        Commands::Sync { dry_run, only, json } => {
            commands::run_sync(&pod, SyncOptions { dry_run, only }, json)
        }
        Commands::Diff { only } => commands::run_diff(&pod, only.as_deref()),
        Commands::Bindings { json } => commands::run_bindings(&pod, json),
        Commands::EditUrl { doc_path } => commands::run_edit_url(&pod, doc_path.as_deref()),
    }
}
