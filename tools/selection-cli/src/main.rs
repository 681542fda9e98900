//! Selection CLI - Command line tool for the product selection feed.
//!
//! Commands:
//! - `selection simulate` - Page through a fixture catalog as the screen would
//! - `selection filter` - Show the profitability verdict for every product
//! - `selection config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use selection_observability::{init_tracing, LogFormat, TracingConfig};
use tracing::Level;

use commands::{ConfigArgs, FilterArgs, SimulateArgs};

/// Selection CLI - Simulate and inspect the product selection feed
#[derive(Parser)]
#[command(name = "selection")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a fixture catalog page by page, scrolling to the end
    Simulate(SimulateArgs),

    /// Evaluate profitability for every product in a fixture
    Filter(FilterArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let tracing_config = TracingConfig::new()
        .with_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_format(if cli.json { LogFormat::Json } else { LogFormat::Pretty });
    if let Err(e) = init_tracing(tracing_config) {
        output.warn(&format!("Logging disabled: {}", e));
    }

    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    let result = match cli.command {
        Commands::Simulate(args) => commands::simulate::run(args, &ctx).await,
        Commands::Filter(args) => commands::filter::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
