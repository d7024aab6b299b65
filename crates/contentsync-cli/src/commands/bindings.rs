//! Bindings command implementation

use colored::Colorize;

use crate::context::Pod;
use crate::error::Result;

/// List the configured bindings. Needs no API access.
pub fn run_bindings(pod: &Pod, json: bool) -> Result<()> {
    let bindings = &pod.manifest.bindings;
    if json {
        println!("{}", serde_json::to_string_pretty(bindings)?);
        return Ok(());
    }

    if bindings.is_empty() {
        println!("No bindings configured in {}.", pod.root.as_str().yellow());
        return Ok(());
    }

    for binding in bindings {
        let mut line = format!(
            "{} {} {}",
            binding.content_type.green(),
            "->".dimmed(),
            binding.collection_path.cyan()
        );
        if let Some(key) = &binding.key_field {
            line.push_str(&format!(" key={key}"));
        }
        if let Some(body) = &binding.body_field {
            line.push_str(&format!(" body={body}"));
        }
        println!("{line}");
    }
    Ok(())
}
