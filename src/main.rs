use clap::Parser;

use tick_liquidity::fetch_data::{self, FetchConfig};
use tick_liquidity::logs;

mod cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    logs::init(cli.verbose);

    match cli.command {
        cli::Command::Fetch {
            pool_id,
            height,
            endpoints,
            timeout_ms,
            output,
        } => {
            let config = FetchConfig::from_env_and_cli(&endpoints, Some(timeout_ms))?;
            fetch_data::run_fetch(config, &output.into_options(pool_id, height))
        }
        cli::Command::Analyze {
            file,
            pool_id,
            height,
            output,
        } => fetch_data::run_analyze(&file, &output.into_options(pool_id, height)),
        cli::Command::Endpoints { endpoints } => {
            fetch_data::list_endpoints(&FetchConfig::from_env_and_cli(&endpoints, None)?)
        }
    }
}
