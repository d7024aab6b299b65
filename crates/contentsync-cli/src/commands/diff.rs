//! Diff command implementation
//!
//! Previews what sync would write as unified diffs against the documents
//! on disk.

use colored::Colorize;
use similar::TextDiff;

use contentsync_core::{ReconcilePlan, WriteAction};

use crate::context::Pod;
use crate::error::{CliError, Result};

/// Run the diff command
pub fn run_diff(pod: &Pod, only: Option<&str>) -> Result<()> {
    let engine = pod.engine()?;
    let mut changed = false;
    let mut failed = 0;

    for binding in engine.selected_bindings(only)? {
        match engine.plan_binding(&binding) {
            Ok(plan) => changed |= print_plan(&plan),
            Err(err) => {
                failed += 1;
                println!(
                    "{} {} ({}): {}",
                    "FAILED".red().bold(),
                    binding.collection_path.cyan(),
                    binding.content_type.dimmed(),
                    err
                );
            }
        }
    }

    if failed > 0 {
        return Err(CliError::user(format!("{failed} binding(s) failed")));
    }
    if !changed {
        println!("{} No changes needed. Collections are in sync.", "OK".green().bold());
    }
    Ok(())
}

/// Print the diff of one plan; true if it changes anything.
fn print_plan(plan: &ReconcilePlan) -> bool {
    if plan.is_noop() {
        return false;
    }

    for write in plan.writes.iter().filter(|write| write.action != WriteAction::Unchanged) {
        let old = write.existing.as_deref().unwrap_or("");
        let path = write.path.as_str();
        let from = match write.action {
            WriteAction::Create => "/dev/null".to_string(),
            _ => format!("a{path}"),
        };
        let diff = TextDiff::from_lines(old, write.text.as_str())
            .unified_diff()
            .header(&from, &format!("b{path}"))
            .to_string();
        print_colored(&diff);
    }

    for path in &plan.deletes {
        println!("{} {}", "deleted".red().bold(), path);
    }
    for warning in &plan.warnings {
        println!("{} {}", "!".yellow(), warning);
    }
    true
}

fn print_colored(diff: &str) {
    for line in diff.lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else {
            println!("{line}");
        }
    }
}
