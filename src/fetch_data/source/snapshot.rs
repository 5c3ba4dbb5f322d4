use std::path::PathBuf;

use async_trait::async_trait;

use crate::fetch_data::decode::decode_liquidity;
use crate::fetch_data::error::{AttemptFailure, FailureKind, FetchError};

use super::{FetchSuccess, LiquiditySource};

/// A saved `liquidity_per_tick_range` response on disk.
///
/// The file is held to the same contract as a live endpoint; a bad file
/// fails as a single-attempt fetch naming the path.
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LiquiditySource for SnapshotFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(
        &self,
        pool_id: &str,
        _block_height: Option<&str>,
    ) -> Result<FetchSuccess, FetchError> {
        if pool_id.trim().is_empty() {
            return Err(FetchError::InvalidPoolId);
        }
        let label = self.describe();

        let body = tokio::fs::read(&self.path).await.map_err(|e| {
            FetchError::AllEndpointsFailed(vec![AttemptFailure::new(
                label.clone(),
                FailureKind::Transport,
                format!("reading snapshot: {e}"),
            )])
        })?;

        let decoded = decode_liquidity(&body).map_err(|(kind, detail)| {
            FetchError::AllEndpointsFailed(vec![AttemptFailure::new(label.clone(), kind, detail)])
        })?;

        tracing::debug!(path = %label, records = decoded.records.len(), "loaded snapshot");
        Ok(FetchSuccess {
            records: decoded.records,
            endpoint: label,
            raw: decoded.raw,
            failures: Vec::new(),
        })
    }
}
