//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Budgie payload budget CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: budgie.toml)
    #[arg(short = 'C', long, default_value = "budgie.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Measure every route once and print the budget table
    #[command(visible_alias = "r")]
    Report {
        /// Dev server port to fetch rendered routes from
        #[arg(short, long)]
        port: Option<u16>,

        /// Pages directory (relative to project root)
        #[arg(long, value_hint = clap::ValueHint::DirPath)]
        pages: Option<PathBuf>,
    },

    /// Report once, then re-report on file changes
    #[command(visible_alias = "w")]
    Watch {
        /// Dev server port to fetch rendered routes from
        #[arg(short, long)]
        port: Option<u16>,

        /// Pages directory (relative to project root)
        #[arg(long, value_hint = clap::ValueHint::DirPath)]
        pages: Option<PathBuf>,
    },
}
