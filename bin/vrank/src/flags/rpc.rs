//! Node connection arguments.

use clap::Args;
use std::time::Duration;
use url::Url;
use vrank_providers_alloy::{KlaytnRpcSource, RetryConfig};

/// Arguments for connecting to a Klaytn node.
#[derive(Args, Debug, Clone)]
pub struct RpcArgs {
    /// URL of the node's JSON-RPC endpoint.
    #[arg(long, visible_alias = "rpc.url", env = "VRANK_RPC_URL")]
    pub rpc: Url,
    /// Retries for transient transport failures.
    #[arg(long = "rpc.max-retries", default_value_t = 5, env = "VRANK_RPC_MAX_RETRIES")]
    pub max_retries: usize,
    /// Delay before the first retry, in milliseconds.
    #[arg(long = "rpc.retry-delay-ms", default_value_t = 200, env = "VRANK_RPC_RETRY_DELAY_MS")]
    pub retry_delay_ms: u64,
}

impl RpcArgs {
    /// Returns the header source described by these arguments.
    pub fn source(&self) -> KlaytnRpcSource {
        let retry = RetryConfig {
            max_retries: self.max_retries,
            min_delay: Duration::from_millis(self.retry_delay_ms),
            ..Default::default()
        };
        KlaytnRpcSource::new(self.rpc.clone()).with_retry(retry)
    }
}
