//! Georesolve CLI
//!
//! Natural language geospatial requests in, structured queries out.

use anyhow::Result;
use clap::Parser;
use georesolve_core::error::exit_codes;
use georesolve_core::{Config, GeoResolveError};

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {:#}", err);
        let code = err
            .downcast_ref::<GeoResolveError>()
            .map(GeoResolveError::exit_code)
            .unwrap_or(exit_codes::GENERAL_ERROR);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_from(&config_path)?;

    match cli.command {
        Commands::Resolve(args) => commands::resolve::run(args, config, cli.format).await,
        Commands::Recommend(args) => commands::recommend::run(args, cli.format),
        Commands::Workflow(args) => commands::workflow::run(args, cli.format),
        Commands::Datasets(args) => commands::datasets::run(args, cli.format),
        Commands::Indices(args) => commands::indices::run(args, cli.format),
        Commands::Geocode(args) => commands::geocode::run(args, &config, cli.format).await,
        Commands::Reverse(args) => commands::geocode::run_reverse(args, &config, cli.format).await,
        Commands::Config(args) => commands::config::run(args, &config, &config_path, cli.format),
    }
}
