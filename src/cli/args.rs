//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::builder::FalseyValueParser;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Dotstep - resumable, dependency-ordered dotfile setup.
#[derive(Debug, Parser)]
#[command(name = "dotstep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (default: ./dotstep.yml, then the user config dir)
    #[arg(short, long, global = true, env = "DOTSTEP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the session file (overrides the configured location)
    #[arg(long, global = true, env = "DOTSTEP_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Show what would run without running anything
    #[arg(
        long,
        global = true,
        env = "DOTSTEP_DRY_RUN",
        value_parser = FalseyValueParser::new()
    )]
    pub dry_run: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Continue after failures without asking
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Never prompt
    #[arg(long, global = true)]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// List steps by category (default if no command specified)
    List,

    /// Show the saved session's progress
    Status,

    /// Run every step in dependency order
    All,

    /// Run the named steps, each after its dependencies
    Steps(StepsArgs),

    /// Continue the pending steps of the saved session
    Resume,

    /// Delete the saved session
    Abandon,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `steps` command.
#[derive(Debug, Clone, clap::Args)]
pub struct StepsArgs {
    /// Step names to run
    #[arg(required = true, num_args = 1.., value_delimiter = ',')]
    pub names: Vec<String>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
