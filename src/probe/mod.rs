//! Reachability probes.

mod ping;

pub use ping::PingProber;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Probe error types.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("command failed: {0}")]
    Command(String),
    #[error("internal error: {0}")]
    Internal(String),
}

/// A single-shot reachability check against one host.
///
/// `Ok(false)` means the host did not answer within the timeout; that is an
/// ordinary outcome, not an error. Errors are reserved for environment
/// failures (no ICMP capability and no ping binary, DNS refusing to resolve)
/// and for `Internal`, which signals something genuinely unexpected.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, host: &str, timeout: Duration) -> Result<bool, ProbeError>;
}
