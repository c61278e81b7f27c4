//! Observation window configuration.

use crate::ConfigError;
use serde::{Deserialize, Serialize};

/// The default observation period in blocks.
pub const DEFAULT_PERIOD: u64 = 3600;

/// The default number of headers fetched concurrently.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 16;

/// Configuration shared by the tracker and the score engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case", deny_unknown_fields)]
pub struct VrankConfig {
    /// The observation period in blocks. Windows start on multiples of it.
    pub period: u64,
    /// The maximum number of header requests in flight.
    pub fetch_concurrency: usize,
}

impl Default for VrankConfig {
    fn default() -> Self {
        Self { period: DEFAULT_PERIOD, fetch_concurrency: DEFAULT_FETCH_CONCURRENCY }
    }
}

impl VrankConfig {
    /// Checks that the configuration values are usable.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.period == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if self.fetch_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }

    /// Returns the last block of the window starting at `start`.
    pub const fn default_end(&self, start: u64) -> u64 {
        start.saturating_add(self.period)
    }

    /// Checks that `[start, end]` is a valid observation window.
    ///
    /// The window must start on a period boundary and span at most `period + 1` blocks.
    pub const fn check_window(&self, start: u64, end: u64) -> Result<(), ConfigError> {
        if let Err(err) = self.validate() {
            return Err(err);
        }
        if start % self.period != 0 {
            return Err(ConfigError::MisalignedStart { start, period: self.period });
        }
        if end < start {
            return Err(ConfigError::InvertedWindow { start, end });
        }
        if end - start > self.period {
            return Err(ConfigError::WindowTooLong { start, end, period: self.period });
        }
        Ok(())
    }
}
