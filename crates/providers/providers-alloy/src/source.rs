//! Klaytn JSON-RPC header source.

use crate::RpcSourceError;
use alloy_primitives::{Address, U64};
use alloy_rpc_client::{ClientBuilder, RpcClient};
use alloy_transport::TransportError;
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use serde::de::DeserializeOwned;
use std::{fmt::Debug, time::Duration};
use tracing::{trace, warn};
use url::Url;
use vrank_core::HeaderSource;
use vrank_protocol::KlaytnHeader;

/// Returns the validator committee at a block.
const GET_COUNCIL: &str = "klay_getCouncil";

/// Returns a header by block number.
const GET_HEADER_BY_NUMBER: &str = "klay_getHeaderByNumber";

/// Exponential backoff applied to transient transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: usize,
    /// The delay before the first retry.
    pub min_delay: Duration,
    /// The upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            min_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryConfig {
    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries)
            .with_jitter()
    }
}

/// A [`HeaderSource`] backed by a Klaytn node's JSON-RPC API.
///
/// Transport failures are retried with exponential backoff. Error responses from the node are
/// returned immediately.
#[derive(Debug, Clone)]
pub struct KlaytnRpcSource {
    client: RpcClient,
    retry: RetryConfig,
}

impl KlaytnRpcSource {
    /// Connects to the node at `url` over HTTP.
    pub fn new(url: Url) -> Self {
        Self::with_client(ClientBuilder::default().http(url))
    }

    /// Wraps an existing RPC client.
    pub fn with_client(client: RpcClient) -> Self {
        Self { client, retry: RetryConfig::default() }
    }

    /// Sets the retry policy.
    pub const fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn request<Resp>(&self, method: &'static str, block: u64) -> Result<Resp, RpcSourceError>
    where
        Resp: DeserializeOwned + Debug + Send + Sync + Unpin + 'static,
    {
        let call = || async { self.client.request::<_, Resp>(method, (U64::from(block),)).await };
        let response = call
            .retry(self.retry.backoff())
            .when(|err: &TransportError| err.is_transport_error())
            .notify(|err, delay| {
                warn!(target: "rpc", method, block, %err, ?delay, "retrying request");
            })
            .await
            .map_err(|source| RpcSourceError::Request { method, source })?;
        trace!(target: "rpc", method, block, "request succeeded");
        Ok(response)
    }
}

#[async_trait]
impl HeaderSource for KlaytnRpcSource {
    type Error = RpcSourceError;

    async fn council_at(&self, block: u64) -> Result<Vec<Address>, Self::Error> {
        self.request(GET_COUNCIL, block).await
    }

    async fn header_by_number(&self, block: u64) -> Result<KlaytnHeader, Self::Error> {
        self.request::<Option<KlaytnHeader>>(GET_HEADER_BY_NUMBER, block)
            .await?
            .ok_or(RpcSourceError::HeaderNotFound(block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_transport::mock::Asserter;
    use serde_json::json;

    fn source(asserter: &Asserter) -> KlaytnRpcSource {
        KlaytnRpcSource::with_client(RpcClient::mocked(asserter.clone()))
    }

    const fn retry(max_retries: usize) -> RetryConfig {
        RetryConfig {
            max_retries,
            min_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_is_retried() {
        let asserter = Asserter::new();
        let source = source(&asserter).with_retry(retry(3));
        let pending = tokio::spawn(async move { source.header_by_number(7).await });

        // The first attempt meets an empty response queue and backs off.
        tokio::time::sleep(Duration::from_millis(1)).await;
        asserter.push_success(&serde_json::Value::Null);

        let err = pending.await.unwrap().unwrap_err();
        assert!(matches!(err, RpcSourceError::HeaderNotFound(7)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_are_bounded() {
        let asserter = Asserter::new();
        let err = source(&asserter).with_retry(retry(2)).council_at(0).await.unwrap_err();
        assert!(matches!(
            &err,
            RpcSourceError::Request { method: GET_COUNCIL, source } if source.is_transport_error()
        ));
    }

    #[tokio::test]
    async fn test_council_is_parsed_case_insensitively() {
        let asserter = Asserter::new();
        asserter.push_success(&json!([
            "0x52d41ca72af615a1ac3301b0a93efa222ecc7541",
            "0x99FB17D324FA0E07F23B49D09028AC0919414DB6"
        ]));

        let council = source(&asserter).council_at(3600).await.unwrap();
        assert_eq!(council.len(), 2);
        assert_eq!(
            council[1].to_checksum(None).to_lowercase(),
            "0x99fb17d324fa0e07f23b49d09028ac0919414db6"
        );
    }

    #[tokio::test]
    async fn test_null_header_is_not_found() {
        let asserter = Asserter::new();
        asserter.push_success(&serde_json::Value::Null);

        let err = source(&asserter).header_by_number(7).await.unwrap_err();
        assert!(matches!(err, RpcSourceError::HeaderNotFound(7)));
    }

    #[tokio::test]
    async fn test_error_response_is_not_retried() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("unknown block");

        let err = source(&asserter).header_by_number(7).await.unwrap_err();
        assert!(matches!(err, RpcSourceError::Request { method: GET_HEADER_BY_NUMBER, .. }));
    }

    #[tokio::test]
    async fn test_header_is_decoded() {
        let asserter = Asserter::new();
        asserter.push_success(&json!({
            "hash": "0xd1c2c178d8c24a67e4ec9f7593a63c0f79c89688e7a983f3f832dc66a760bef6",
            "parentHash": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "reward": "0x0000000000000000000000000000000000000000",
            "stateRoot": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "transactionsRoot": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "receiptsRoot": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "logsBloom": format!("0x{}", "0".repeat(512)),
            "blockScore": "0x1",
            "number": "0xe10",
            "gasUsed": "0x0",
            "timestamp": "0x5d0f2b2a",
            "timestampFoS": "0x0",
            "extraData": format!("0x{}c3c080c0", "0".repeat(64)),
        }));

        let header = source(&asserter).header_by_number(3600).await.unwrap();
        assert_eq!(header.number, 3600);
        assert!(header.extra().unwrap().committed_seals.is_empty());
    }
}
