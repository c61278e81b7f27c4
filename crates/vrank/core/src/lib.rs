#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod checksum;

mod error;
pub use error::{CacheError, ConfigError, ScoreError, SourceError, TrackerError};

mod config;
pub use config::{DEFAULT_FETCH_CONCURRENCY, DEFAULT_PERIOD, VrankConfig};

mod council;
pub use council::Council;

mod record;
pub use record::{BlockRecord, RecordDiagnostics, WindowDiagnostics};

mod window;
pub use window::Window;

mod source;
pub use source::HeaderSource;

mod tracker;
pub use tracker::ParticipationTracker;

pub mod score;
pub use score::{ScoreEngine, ScoreTable, ValidatorScore};

mod cache;
pub use cache::RecordCache;

mod metrics;
pub use metrics::Metrics;
