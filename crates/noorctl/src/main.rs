//! noorctl - prayer times dashboard and one-shot commands

use clap::Parser;
use noorctl::app::load_config;
use noorctl::cli::{Cli, Commands};
use noorctl::commands;
use noorctl::errors::exit_code_for;
use noorctl::logging::{init_logging, route_panics_to_log, LogTarget};
use owo_colors::OwoColorize;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // The dashboard owns the terminal, so its logs go to a file
    let target = match cli.command {
        None | Some(Commands::Dashboard) => LogTarget::File,
        Some(_) => LogTarget::Stderr,
    };
    if let Err(e) = init_logging(target, cli.global.verbose) {
        eprintln!("{} {:#}", "warning:".yellow(), e);
    }
    if target == LogTarget::File {
        route_panics_to_log();
    }

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(exit_code_for(&e));
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli.global)?;
    tracing::debug!(method = %config.calculation, "Configuration loaded");

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Dashboard => noorctl::tui::run(&config).await,
        Commands::Today { date, json } => commands::today(&config, date, json).await,
        Commands::Next { at, json } => commands::next(&config, at, json).await,
        Commands::Reflection { json } => commands::reflection(&config, json).await,
        Commands::Config { action } => commands::config(&config, action),
    }
}
