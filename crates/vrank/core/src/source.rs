//! The data source the tracker reads headers and committees from.

use alloy_primitives::Address;
use async_trait::async_trait;
use vrank_protocol::KlaytnHeader;

/// A source of committees and block headers, typically a node's JSON-RPC endpoint.
#[async_trait]
pub trait HeaderSource: Send + Sync {
    /// The error type returned by the source.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the validator committee at `block`, in committee order.
    async fn council_at(&self, block: u64) -> Result<Vec<Address>, Self::Error>;

    /// Returns the header of `block`.
    ///
    /// A block the source does not know is an error, not an empty result.
    async fn header_by_number(&self, block: u64) -> Result<KlaytnHeader, Self::Error>;
}
