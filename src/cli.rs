use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use tick_liquidity::fetch_data::RunOptions;
use tick_liquidity::fetch_data::config::DEFAULT_TIMEOUT_MS;

/// Concentrated-liquidity tick explorer: fetch an Osmosis pool's liquidity
/// per tick range from redundant REST endpoints, summarize and filter it,
/// and export CSV or chart data.
#[derive(Parser)]
#[command(name = "tick-liquidity", version, about)]
pub struct Cli {
    /// Debug-level logging (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch a pool's liquidity per tick range, trying endpoints in order
    Fetch {
        /// Pool ID to query
        pool_id: String,

        /// Query state at this block height (sent as x-cosmos-block-height)
        #[arg(long)]
        height: Option<String>,

        /// Endpoint base URL; repeat to build a priority list
        /// (default: TICK_LIQUIDITY_ENDPOINTS or the built-in list)
        #[arg(long = "endpoint")]
        endpoints: Vec<String>,

        /// Per-endpoint timeout in milliseconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
        timeout_ms: u64,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Analyze a saved liquidity_per_tick_range JSON response
    Analyze {
        /// Path to the JSON file
        file: PathBuf,

        /// Pool ID used for output file names
        #[arg(long, default_value = "snapshot")]
        pool_id: String,

        /// Block height the snapshot was taken at (labels only)
        #[arg(long)]
        height: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the effective endpoint list
    Endpoints {
        /// Endpoint base URL override; repeatable
        #[arg(long = "endpoint")]
        endpoints: Vec<String>,
    },
}

#[derive(Args)]
pub struct OutputArgs {
    /// Directory for exported files
    #[arg(long, short = 'o', default_value = ".")]
    pub out_dir: PathBuf,

    /// Write a CSV export (lower_tick,upper_tick,liquidity_amount,tick_range)
    #[arg(long)]
    pub csv: bool,

    /// Export all parsed rows instead of the outlier-filtered subset
    #[arg(long)]
    pub export_all: bool,

    /// Write a Plotly scatter3d chart description as JSON
    #[arg(long)]
    pub chart: bool,

    /// Marker size slider value (1-100)
    #[arg(long, default_value = "50")]
    pub dot_size: f64,

    /// Save the response body as received
    #[arg(long)]
    pub save_raw: bool,

    /// Print a JSON report instead of the text summary
    #[arg(long)]
    pub json: bool,

    /// Histogram bins in the text summary
    #[arg(long, default_value = "20")]
    pub bins: usize,
}

impl OutputArgs {
    pub fn into_options(self, pool_id: String, block_height: Option<String>) -> RunOptions {
        RunOptions {
            pool_id,
            block_height,
            out_dir: self.out_dir,
            csv: self.csv,
            export_all: self.export_all,
            chart: self.chart,
            dot_size: self.dot_size,
            save_raw: self.save_raw,
            json: self.json,
            bins: self.bins,
        }
    }
}
