//! CLI command implementations.

pub mod kit;
pub mod quote;
pub mod steps;

use clap::Args;

/// Arguments for the steps command.
#[derive(Args)]
pub struct StepsArgs {
    /// Catalog JSON file.
    #[arg(long)]
    pub catalog: String,

    /// Product to inspect.
    #[arg(short, long)]
    pub product: String,
}

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    /// Catalog JSON file.
    #[arg(long)]
    pub catalog: String,

    /// Action script (JSON).
    #[arg(short, long)]
    pub script: String,
}

/// Arguments for the kit command.
#[derive(Args)]
pub struct KitArgs {
    /// Catalog JSON file.
    #[arg(long)]
    pub catalog: String,

    /// Kit to fill.
    #[arg(short, long)]
    pub kit: String,

    /// Changes to apply, e.g. `brigadeiro+` or `beijinho-`.
    pub changes: Vec<String>,
}
