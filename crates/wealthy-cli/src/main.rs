//! Wealthy Ways CLI - Financial wellbeing profiler
//!
//! Usage:
//!   wealthy assess --income 50000 --expenses 20000 --savings 15000 --debt 5000 --budgets
//!   wealthy report ... --format csv --output .
//!   wealthy schema            Show feature schema and scoring scale
//!   wealthy models            Show loaded model bundle
//!   wealthy serve --port 3000 Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref(), cli.models_dir.as_deref())?;

    match cli.command {
        Commands::Assess { record, json } => {
            let pipeline = commands::open_pipeline(config)?;
            commands::cmd_assess(&pipeline, &record, json)
        }
        Commands::Report {
            record,
            format,
            output,
        } => {
            let pipeline = commands::open_pipeline(config)?;
            commands::cmd_report(&pipeline, &record, &format, output.as_deref())
        }
        Commands::Schema => commands::cmd_schema(&config),
        Commands::Models => {
            let pipeline = commands::open_pipeline(config)?;
            commands::cmd_models(&pipeline)
        }
        Commands::Serve {
            port,
            host,
            allow_origin,
        } => {
            let pipeline = commands::open_pipeline(config)?;
            commands::cmd_serve(pipeline, &host, port, allow_origin).await
        }
    }
}
