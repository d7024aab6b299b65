//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// contentsync - Mirror CMS entries into site collections
#[derive(Parser, Debug)]
#[command(name = "contentsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Pod root; defaults to the nearest directory holding contentsync.toml
    #[arg(long, global = true, value_name = "DIR")]
    pub pod: Option<PathBuf>,

    /// Delivery API access token, overriding the config
    #[arg(long, global = true, env = "CONTENTFUL_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Fetch every bound content type and reconcile its collection
    Sync {
        /// Report what would change without writing or deleting
        #[arg(long)]
        dry_run: bool,

        /// Only sync the binding of this collection
        #[arg(long, value_name = "COLLECTION")]
        only: Option<String>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a unified diff of what sync would write
    Diff {
        /// Only diff the binding of this collection
        #[arg(long, value_name = "COLLECTION")]
        only: Option<String>,
    },

    /// List configured bindings
    Bindings {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the CMS edit URL for a document, or for the space
    EditUrl {
        /// Pod path of a synced document, e.g. /content/posts/hello.yaml
        doc_path: Option<String>,
    },
}
