use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "curfew")]
#[command(version)]
#[command(about = "Deadline-driven file permission and group ownership enforcement")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the policy tree and enforce it on the filesystem
    Apply {
        /// Root of the governed directory tree (defaults to the current directory)
        root: Option<PathBuf>,

        /// Configuration file (defaults to <ROOT>/_curfew.yml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Report what would change without touching the filesystem
        #[arg(long)]
        dry_run: bool,

        /// Freeze "now" at an RFC 3339 instant instead of the wall clock
        #[arg(long)]
        now: Option<String>,
    },

    /// Validate the configuration without applying anything
    Check {
        /// Root of the governed directory tree (defaults to the current directory)
        root: Option<PathBuf>,

        /// Configuration file (defaults to <ROOT>/_curfew.yml)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show which policy governs a path and what it resolves to
    Explain {
        /// The path to explain
        path: PathBuf,

        /// Root of the governed directory tree (defaults to the current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Configuration file (defaults to <ROOT>/_curfew.yml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Freeze "now" at an RFC 3339 instant instead of the wall clock
        #[arg(long)]
        now: Option<String>,
    },
}
