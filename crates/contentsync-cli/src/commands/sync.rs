//! Sync command implementation

use colored::Colorize;

use contentsync_core::{BindingReport, SyncOptions, SyncReport};

use crate::context::Pod;
use crate::error::{CliError, Result};

/// Run the sync command
///
/// Exits with an error when any binding was aborted, after the report of
/// every binding has been printed.
pub fn run_sync(pod: &Pod, options: SyncOptions, json: bool) -> Result<()> {
    if !json {
        println!(
            "{} Syncing space {} into {}{}",
            "=>".blue().bold(),
            pod.manifest.contentful.space.cyan(),
            pod.root.as_str().yellow(),
            if options.dry_run { " (dry run)" } else { "" }
        );
    }

    let mut engine = pod.engine()?;
    let report = engine.run(&options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    let failed = report.failures().count();
    if failed > 0 {
        return Err(CliError::user(format!("{failed} binding(s) failed")));
    }
    Ok(())
}

fn print_report(report: &SyncReport) {
    for binding in &report.bindings {
        print_binding(binding);
    }
    if report.success() {
        println!("{} Sync complete.", "OK".green().bold());
    }
}

fn print_binding(binding: &BindingReport) {
    println!();
    println!(
        "{} {} ({})",
        "Collection".bold(),
        binding.collection.cyan(),
        binding.content_type.dimmed()
    );

    if let Some(error) = &binding.error {
        println!("   {} {}", "FAILED".red().bold(), error);
        return;
    }

    let verb = |done: &'static str, planned: &'static str| if binding.dry_run { planned } else { done };
    for path in &binding.created {
        println!("   {} {} {}", "+".green(), verb("created", "would create"), path);
    }
    for path in &binding.updated {
        println!("   {} {} {}", "~".yellow(), verb("updated", "would update"), path);
    }
    for path in &binding.deleted {
        println!("   {} {} {}", "-".red(), verb("deleted", "would delete"), path);
    }
    for warning in &binding.warnings {
        println!("   {} {}", "!".yellow(), warning);
    }
    println!(
        "   {} created, {} updated, {} unchanged, {} deleted",
        binding.created.len(),
        binding.updated.len(),
        binding.unchanged.len(),
        binding.deleted.len()
    );
}
