use std::time::Duration;

use anyhow::{Context, Result, bail};
use url::Url;

pub const QUERY_PATH: &str = "/osmosis/concentratedliquidity/v1beta1/liquidity_per_tick_range";
pub const BLOCK_HEIGHT_HEADER: &str = "x-cosmos-block-height";
pub const DEFAULT_TIMEOUT_MS: u64 = 8000;
pub const ENDPOINTS_ENV: &str = "TICK_LIQUIDITY_ENDPOINTS";

/// Osmosis REST endpoints from the chain registry, tried in this order.
pub const DEFAULT_ENDPOINTS: &[&str] = &[
    "https://lcd.osmosis.zone",
    "https://rest-osmosis.ecostake.com",
    "https://osmosis-api.polkachu.com",
    "https://rest.lavenderfive.com:443/osmosis",
    "https://osmosis-rest.publicnode.com",
    "https://osmosis.rest.stakin-nodes.com",
];

/// Endpoint list and per-attempt deadline for the fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Normalised base URLs, in priority order.
    pub endpoints: Vec<String>,
    /// Deadline for one endpoint attempt (request + body).
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            user_agent: concat!("tick-liquidity/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    /// Build from CLI flags and the process environment.
    pub fn from_env_and_cli(cli_endpoints: &[String], timeout_ms: Option<u64>) -> Result<Self> {
        Self::resolve(cli_endpoints, std::env::var(ENDPOINTS_ENV).ok(), timeout_ms)
    }

    /// CLI endpoints win over the env list, which wins over the built-ins.
    pub fn resolve(
        cli_endpoints: &[String],
        env_endpoints: Option<String>,
        timeout_ms: Option<u64>,
    ) -> Result<Self> {
        let mut config = Self::default();

        let raw: Vec<String> = if !cli_endpoints.is_empty() {
            cli_endpoints.to_vec()
        } else if let Some(list) = env_endpoints.filter(|s| !s.trim().is_empty()) {
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        } else {
            Vec::new()
        };

        if !raw.is_empty() {
            config.endpoints = raw
                .iter()
                .map(|e| normalize_endpoint(e))
                .collect::<Result<Vec<_>>>()?;
        }

        if let Some(ms) = timeout_ms {
            if ms == 0 {
                bail!("timeout must be greater than 0 ms");
            }
            config.timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

/// Check that `raw` is an absolute http(s) URL and strip trailing slashes.
pub fn normalize_endpoint(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).with_context(|| format!("invalid endpoint URL '{raw}'"))?;
    match url.scheme() {
        "http" | "https" => {}
        other => bail!("endpoint '{raw}' has unsupported scheme '{other}'"),
    }
    if url.host_str().is_none() {
        bail!("endpoint '{raw}' has no host");
    }
    Ok(trimmed.to_string())
}

/// Full query URL for one endpoint. Any path prefix on the base is kept.
pub fn query_url(endpoint: &str, pool_id: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(endpoint)?;
    let path = format!("{}{}", url.path().trim_end_matches('/'), QUERY_PATH);
    url.set_path(&path);
    url.query_pairs_mut().clear().append_pair("pool_id", pool_id);
    Ok(url)
}
