//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Flavor wheel builder: turn flat taxonomy CSV into a three-level tree for sunburst charts
#[derive(Parser, Debug)]
#[command(name = "flavorwheel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, env = "FLAVORWHEEL_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the hierarchy and print it as JSON
    Build {
        /// Flavor CSV file ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Write JSON to this file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
        /// Sort leaves by name
        #[arg(long)]
        sorted: bool,
    },

    /// Show the hierarchy as an ASCII tree
    Tree {
        /// Flavor CSV file ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Sort leaves by name
        #[arg(long)]
        sorted: bool,
    },

    /// Show node counts per level
    Summary {
        /// Flavor CSV file ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create global config template
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
