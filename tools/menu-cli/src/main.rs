//! Menu CLI - inspect and quote configurable menu products.
//!
//! Commands:
//! - `menu steps` - Show how a product's modifier groups are presented
//! - `menu quote` - Replay an action script and print the resulting cart
//! - `menu kit` - Fill a kit and print the result

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use commands::{KitArgs, QuoteArgs, StepsArgs};

/// Menu CLI - configure products and kits against a catalog file
#[derive(Parser)]
#[command(name = "menu")]
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

    /// Store slug the cart belongs to
    #[arg(long, global = true, default_value = "local")]
    store: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the step plan of a product
    Steps(StepsArgs),

    /// Replay an action script and print the cart
    Quote(QuoteArgs),

    /// Fill a kit and commit it
    Kit(KitArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "menu=debug" } else { "menu=warn" };
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .init();

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = context::Context::load(cli.config.as_deref(), &cli.store, output)?;

    let result = match cli.command {
        Commands::Steps(args) => commands::steps::run(args, &ctx).await,
        Commands::Quote(args) => commands::quote::run(args, &ctx).await,
        Commands::Kit(args) => commands::kit::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
