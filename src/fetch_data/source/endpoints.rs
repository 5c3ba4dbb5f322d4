use std::error::Error as _;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::fetch_data::config::{BLOCK_HEIGHT_HEADER, FetchConfig, query_url};
use crate::fetch_data::decode::{DecodedBody, decode_liquidity};
use crate::fetch_data::error::{AttemptFailure, FailureKind, FetchError};

use super::{FetchSuccess, LiquiditySource};

/// Queries the configured endpoints one after another and returns the first
/// structurally valid answer.
///
/// Attempts are strictly sequential so the winner is always the first healthy
/// endpoint in priority order. Every attempt runs under its own deadline; an
/// expired deadline only abandons that endpoint.
pub struct EndpointFetcher {
    client: reqwest::Client,
    endpoints: Vec<String>,
    timeout: Duration,
    progress: Option<indicatif::ProgressBar>,
}

impl EndpointFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            endpoints: config.endpoints,
            timeout: config.timeout,
            progress: None,
        })
    }

    /// Report each attempt on a spinner.
    pub fn with_progress(mut self, progress: indicatif::ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Try every endpoint in order until one returns a valid `liquidity` array.
    pub async fn fetch_liquidity(
        &self,
        pool_id: &str,
        block_height: Option<&str>,
    ) -> Result<FetchSuccess, FetchError> {
        if pool_id.trim().is_empty() {
            return Err(FetchError::InvalidPoolId);
        }
        if self.endpoints.is_empty() {
            return Err(FetchError::NoEndpoints);
        }
        let block_height = block_height.filter(|h| !h.is_empty());

        let mut failures: Vec<AttemptFailure> = Vec::new();
        for (i, endpoint) in self.endpoints.iter().enumerate() {
            tracing::debug!(
                endpoint = %endpoint,
                attempt = i + 1,
                pool_id,
                "querying tick liquidity"
            );
            if let Some(pb) = &self.progress {
                pb.set_message(format!(
                    "[{}/{}] {}",
                    i + 1,
                    self.endpoints.len(),
                    endpoint
                ));
            }

            match self.attempt(endpoint, pool_id, block_height).await {
                Ok(DecodedBody { records, raw }) => {
                    tracing::info!(
                        endpoint = %endpoint,
                        records = records.len(),
                        failed_before = failures.len(),
                        "fetched tick liquidity"
                    );
                    return Ok(FetchSuccess {
                        records,
                        endpoint: endpoint.clone(),
                        raw,
                        failures,
                    });
                }
                Err(failure) => {
                    tracing::warn!(
                        endpoint = %endpoint,
                        kind = %failure.kind,
                        "{}",
                        failure.detail
                    );
                    failures.push(failure);
                }
            }
        }

        Err(FetchError::AllEndpointsFailed(failures))
    }

    async fn attempt(
        &self,
        endpoint: &str,
        pool_id: &str,
        block_height: Option<&str>,
    ) -> Result<DecodedBody, AttemptFailure> {
        let url = query_url(endpoint, pool_id).map_err(|e| {
            AttemptFailure::new(endpoint, FailureKind::Transport, format!("bad URL: {e}"))
        })?;

        let mut request = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(height) = block_height {
            request = request.header(BLOCK_HEIGHT_HEADER, height);
        }

        let exchange = async {
            let resp = request
                .send()
                .await
                .map_err(|e| transport(endpoint, &e))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(AttemptFailure::http(endpoint, status.as_u16()));
            }
            let body = resp.bytes().await.map_err(|e| transport(endpoint, &e))?;
            decode_liquidity(&body)
                .map_err(|(kind, detail)| AttemptFailure::new(endpoint, kind, detail))
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(outcome) => outcome,
            Err(_) => Err(AttemptFailure::timeout(endpoint, self.timeout)),
        }
    }
}

#[async_trait]
impl LiquiditySource for EndpointFetcher {
    fn describe(&self) -> String {
        format!("{} endpoint(s)", self.endpoints.len())
    }

    async fn fetch(
        &self,
        pool_id: &str,
        block_height: Option<&str>,
    ) -> Result<FetchSuccess, FetchError> {
        self.fetch_liquidity(pool_id, block_height).await
    }
}

fn transport(endpoint: &str, err: &reqwest::Error) -> AttemptFailure {
    // reqwest's top-level message hides the cause ("error sending request")
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    AttemptFailure::new(endpoint, FailureKind::Transport, detail)
}
