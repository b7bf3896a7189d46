//! CLI argument definitions for Tickscan.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scan` | Run a scan over the symbol universe |
//! | `quote` | Fetch quotes for explicit symbols |
//! | `summary` | Quick gainers/losers/most-active overview |
//! | `universe` | Show the configured symbol universe |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! # Top gainers, default filters
//! tickscan scan
//!
//! # Momentum plays under $50 with readable output
//! tickscan scan --scan-type momentum --max-price 50 --format table
//!
//! # Quotes for explicit symbols
//! tickscan quote AAPL MSFT --pretty
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Tickscan - market scanning CLI
///
/// Scans a symbol universe against named predicates (gainers, losers,
/// breakouts, ...) and ranks the survivors by a composite score. Runs in
/// demo mode when no provider API key is configured.
#[derive(Debug, Parser)]
#[command(
    name = "tickscan",
    author,
    version,
    about = "Stock scanning CLI",
    long_about = "Tickscan scans a configurable symbol universe against named predicates \
and ranks matches by a composite volume/move/momentum score.\n\
\n\
Provider selection is credential-driven:\n\
  TICKSCAN_FMP_API_KEY      Financial Modeling Prep\n\
  TICKSCAN_POLYGON_API_KEY  Polygon.io\n\
  (neither set)             deterministic demo data\n\
\n\
Use 'tickscan <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    ///
    /// - json: Single JSON object (default)
    /// - table: ASCII table format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a scan over the symbol universe.
    ///
    /// Fetches quotes in batches, applies the bound filters and the chosen
    /// scan predicate, then ranks survivors by composite score.
    ///
    /// # Examples
    ///
    ///   tickscan scan
    ///   tickscan scan --scan-type breakouts --limit 10
    ///   tickscan scan --scan-type high_volume --min-volume 5000000
    Scan(ScanArgs),

    /// Fetch latest quote(s) for one or more symbols.
    ///
    /// # Examples
    ///
    ///   tickscan quote AAPL
    ///   tickscan quote AAPL MSFT GOOGL --pretty
    Quote(QuoteArgs),

    /// Quick market overview from bellwether symbols.
    Summary,

    /// Show the configured symbol universe.
    Universe(UniverseArgs),
}

/// Arguments for the `scan` command.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Scan predicate to apply.
    ///
    /// One of: all, top_gainers, top_losers, high_volume, breakouts,
    /// momentum, penny_stocks, under_10, oversold, overbought.
    #[arg(long, default_value = "top_gainers")]
    pub scan_type: String,

    /// Minimum share price.
    #[arg(long, default_value_t = tickscan_core::scanner::DEFAULT_MIN_PRICE)]
    pub min_price: f64,

    /// Maximum share price.
    #[arg(long, default_value_t = tickscan_core::scanner::DEFAULT_MAX_PRICE)]
    pub max_price: f64,

    /// Minimum daily volume.
    #[arg(long, default_value_t = tickscan_core::scanner::DEFAULT_MIN_VOLUME)]
    pub min_volume: u64,

    /// Restrict to one sector (case-insensitive). "ALL" disables the filter.
    #[arg(long, default_value = "ALL")]
    pub sector: String,

    /// Maximum number of results to return.
    #[arg(long, default_value_t = tickscan_core::scanner::DEFAULT_LIMIT)]
    pub limit: usize,

    /// Number of universe symbols to scan.
    #[arg(long, default_value_t = tickscan_core::scanner::DEFAULT_UNIVERSE_SIZE)]
    pub universe_size: usize,

    /// Drop results scoring below this composite score (0-100).
    #[arg(long)]
    pub min_score: Option<f64>,
}

/// Arguments for the `quote` command.
#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// One or more market symbols (e.g., AAPL, MSFT, GOOGL).
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,
}

/// Arguments for the `universe` command.
#[derive(Debug, Args)]
pub struct UniverseArgs {
    /// Only show entries flagged as popular.
    #[arg(long, default_value_t = false)]
    pub popular_only: bool,
}
