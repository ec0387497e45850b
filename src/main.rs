//! Budgie - per-route JavaScript payload budgets for server-rendered apps.

mod bundle;
mod cli;
mod config;
mod core;
mod extract;
mod history;
mod logger;
mod pages;
mod pipeline;
mod report;
mod resolve;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::BudgetConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = BudgetConfig::load(&cli)?;

    match &cli.command {
        Commands::Report { .. } => cli::report::run(config),
        Commands::Watch { .. } => cli::watch::run(config),
    }
}
