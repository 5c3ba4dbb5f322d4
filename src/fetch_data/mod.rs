pub mod config;
pub mod decode;
pub mod error;
#[cfg(feature = "full")]
mod run;
#[cfg(feature = "full")]
pub mod source;

pub use config::FetchConfig;
pub use error::{AttemptFailure, FailureKind, FetchError};
#[cfg(feature = "full")]
pub use run::{RunOptions, list_endpoints, run_analyze, run_fetch};
