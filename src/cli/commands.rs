//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - run: start a light and let watcher threads wait for green
//! - watch: start a light and sample its current phase

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Trafficlight - a traffic light that hands its phase changes to waiting threads
#[derive(Parser, Debug)]
#[command(name = "trafficlight")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a light and let watcher threads cross on green
    Run {
        /// Number of watcher threads
        #[arg(short, long)]
        watchers: Option<usize>,

        /// Greens each watcher waits for before leaving
        #[arg(short = 'n', long)]
        crossings: Option<u32>,

        #[command(flatten)]
        timing: TimingArgs,
    },

    /// Start a light and print every phase change seen by sampling it
    Watch {
        /// How long to watch, in seconds
        #[arg(short, long, default_value_t = 20)]
        duration: u64,

        #[command(flatten)]
        timing: TimingArgs,
    },
}

/// Cycle overrides shared by every command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct TimingArgs {
    /// Shortest cycle in seconds
    #[arg(long)]
    pub min_seconds: Option<u64>,

    /// Longest cycle in seconds
    #[arg(long)]
    pub max_seconds: Option<u64>,

    /// Seed for reproducible cycle durations
    #[arg(long)]
    pub seed: Option<u64>,
}
