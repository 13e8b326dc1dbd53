//! CLI argument definitions for Tether.
//!
//! Each command corresponds to a handler in the [`super::commands`] module.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "tether",
    version,
    about = "Resolve package dependencies across project, system and remote repositories"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the project's dependencies and print the outcome
    Resolve {
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Print the dependency tree
        #[arg(long)]
        tree: bool,
        /// Maximum tree depth
        #[arg(long, requires = "tree")]
        depth: Option<usize>,
        /// Explain why a package is included
        #[arg(long)]
        why: Option<String>,
    },

    /// List installed packages with newer versions available
    Update {
        /// Scan the system repository instead of the current project
        #[arg(long)]
        system: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

pub fn parse() -> Cli {
    Cli::parse()
}
