//! Errors of the JSON-RPC header source.

use alloy_transport::TransportError;
use thiserror::Error;

/// A failed JSON-RPC request.
#[derive(Error, Debug)]
pub enum RpcSourceError {
    /// The request failed, after retries if the failure was transient.
    #[error("{method} failed: {source}")]
    Request {
        /// The JSON-RPC method.
        method: &'static str,
        /// The transport failure.
        #[source]
        source: TransportError,
    },
    /// The node does not know the requested header.
    #[error("header {0} not found")]
    HeaderNotFound(u64),
}
