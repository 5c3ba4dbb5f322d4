use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Why a single endpoint attempt did not produce data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Non-2xx response.
    Http { status: u16 },
    /// Connection, TLS, DNS or body-read failure.
    Transport,
    /// Per-attempt deadline exceeded.
    Timeout,
    /// Body was not JSON.
    Decode,
    /// JSON without a usable `liquidity` array.
    Validation,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Http { status } => write!(f, "http {status}"),
            FailureKind::Transport => f.write_str("transport"),
            FailureKind::Timeout => f.write_str("timeout"),
            FailureKind::Decode => f.write_str("decode"),
            FailureKind::Validation => f.write_str("validation"),
        }
    }
}

/// Diagnostic for one failed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptFailure {
    pub endpoint: String,
    pub kind: FailureKind,
    pub detail: String,
}

impl AttemptFailure {
    pub fn new(endpoint: impl Into<String>, kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            kind,
            detail: detail.into(),
        }
    }

    pub fn http(endpoint: impl Into<String>, status: u16) -> Self {
        Self::new(endpoint, FailureKind::Http { status }, format!("HTTP {status}"))
    }

    pub fn timeout(endpoint: impl Into<String>, after: Duration) -> Self {
        Self::new(
            endpoint,
            FailureKind::Timeout,
            format!("timed out after {} ms", after.as_millis()),
        )
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.endpoint, self.detail)
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("pool id must not be empty")]
    InvalidPoolId,

    #[error("no endpoints configured")]
    NoEndpoints,

    #[cfg(feature = "full")]
    #[error("creating HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("All endpoints failed:\n{}", render_lines(.0))]
    AllEndpointsFailed(Vec<AttemptFailure>),
}

impl FetchError {
    /// Per-endpoint diagnostics, in attempt order. Empty for the
    /// pre-flight variants.
    pub fn failures(&self) -> &[AttemptFailure] {
        match self {
            FetchError::AllEndpointsFailed(f) => f,
            _ => &[],
        }
    }
}

fn render_lines(failures: &[AttemptFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
