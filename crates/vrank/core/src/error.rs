//! Error types for window construction, scoring and the record cache.

use alloy_primitives::Address;
use std::path::PathBuf;
use thiserror::Error;
use vrank_protocol::DecodeError;

/// A boxed error returned by a [`crate::HeaderSource`].
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An invalid observation window or configuration.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The period is zero.
    #[error("period must be positive")]
    ZeroPeriod,
    /// The fetch concurrency is zero.
    #[error("fetch concurrency must be positive")]
    ZeroConcurrency,
    /// The window does not start on a period boundary.
    #[error("start block {start} is not a multiple of the period {period}")]
    MisalignedStart {
        /// The requested start block.
        start: u64,
        /// The configured period.
        period: u64,
    },
    /// The window ends before it starts.
    #[error("end block {end} precedes start block {start}")]
    InvertedWindow {
        /// The requested start block.
        start: u64,
        /// The requested end block.
        end: u64,
    },
    /// The window spans more than one period.
    #[error("end block {end} exceeds start block {start} plus the period {period}")]
    WindowTooLong {
        /// The requested start block.
        start: u64,
        /// The requested end block.
        end: u64,
        /// The configured period.
        period: u64,
    },
}

/// A fatal failure while building a window of block records.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// The window was rejected before any fetch.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The council could not be fetched.
    #[error("failed to fetch the council at block {block}: {source}")]
    Council {
        /// The block the council was requested at.
        block: u64,
        /// The underlying source error.
        #[source]
        source: SourceError,
    },
    /// The source returned an empty council.
    #[error("the council at block {0} is empty")]
    EmptyCouncil(u64),
    /// A header could not be fetched.
    #[error("failed to fetch header {block}: {source}")]
    Fetch {
        /// The missing block number.
        block: u64,
        /// The underlying source error.
        #[source]
        source: SourceError,
    },
    /// The source answered with a different header than requested.
    #[error("requested header {requested} but the source returned header {received}")]
    UnexpectedHeader {
        /// The requested block number.
        requested: u64,
        /// The block number of the returned header.
        received: u64,
    },
    /// A header's extra-data field could not be decoded.
    #[error("failed to decode header {block}: {source}")]
    Decode {
        /// The block whose header is malformed.
        block: u64,
        /// The decode failure.
        #[source]
        source: DecodeError,
    },
}

/// A block record sequence that cannot be scored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    /// The period is zero.
    #[error("period must be positive")]
    ZeroPeriod,
    /// The window bounds are not a valid observation window.
    #[error("invalid window: {0}")]
    Window(#[from] ConfigError),
    /// A record lies outside the window bounds.
    #[error("record for block {block} lies outside the window [{start}, {end}]")]
    OutOfWindow {
        /// The offending block.
        block: u64,
        /// The first block of the window.
        start: u64,
        /// The last block of the window.
        end: u64,
    },
    /// Block numbers do not strictly increase.
    #[error("record for block {block} does not follow block {previous}")]
    UnorderedRecords {
        /// The previously applied block.
        previous: u64,
        /// The offending block.
        block: u64,
    },
    /// A record names an address outside the council.
    #[error("record for block {block} names {address}, which is not in the council")]
    UnknownValidator {
        /// The offending block.
        block: u64,
        /// The unknown address.
        address: Address,
    },
    /// A record lists a validator as both voter and non-voter, or more than once.
    #[error("record for block {block} lists {address} more than once")]
    DuplicateValidator {
        /// The offending block.
        block: u64,
        /// The repeated address.
        address: Address,
    },
    /// A record omits a council member.
    #[error("record for block {block} omits council member {address}")]
    IncompleteRecord {
        /// The offending block.
        block: u64,
        /// The missing address.
        address: Address,
    },
}

/// A failure reading or writing the block record cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The cache file already exists and overwriting was not requested.
    #[error("refusing to overwrite existing cache {}", .0.display())]
    AlreadyExists(PathBuf),
    /// An I/O error on the cache file.
    #[error("i/o error on cache {}: {source}", path.display())]
    Io {
        /// The cache path.
        path: PathBuf,
        /// The I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The cache contents are not a valid window document.
    #[error("invalid cache {}: {source}", path.display())]
    Json {
        /// The cache path.
        path: PathBuf,
        /// The JSON failure.
        #[source]
        source: serde_json::Error,
    },
    /// The cached records do not form a valid window.
    #[error("invalid cache {}: {source}", path.display())]
    Invalid {
        /// The cache path.
        path: PathBuf,
        /// The record invariant violation.
        #[source]
        source: ScoreError,
    },
}
