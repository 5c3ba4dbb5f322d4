pub mod endpoints;
pub mod snapshot;

use async_trait::async_trait;
use serde_json::Value;

use crate::model::TickRecord;

use super::error::{AttemptFailure, FetchError};

pub use endpoints::EndpointFetcher;
pub use snapshot::SnapshotFile;

/// Records from the first source that answered.
#[derive(Debug, Clone)]
pub struct FetchSuccess {
    pub records: Vec<TickRecord>,
    /// Endpoint (or file) the records came from.
    pub endpoint: String,
    /// Response body as received.
    pub raw: Value,
    /// Failures recorded before `endpoint` answered, in attempt order.
    pub failures: Vec<AttemptFailure>,
}

/// Anything that can produce the tick liquidity of a pool.
#[async_trait]
pub trait LiquiditySource: Send + Sync {
    /// Short label for progress and log lines.
    fn describe(&self) -> String;

    async fn fetch(
        &self,
        pool_id: &str,
        block_height: Option<&str>,
    ) -> Result<FetchSuccess, FetchError>;
}
