//! Metrics recorded while building participation windows.

/// Container for metric names and their registration.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Identifier for the counter of headers turned into block records.
    pub const BLOCKS_PROCESSED: &'static str = "vrank_blocks_processed_total";
    /// Identifier for the counter of committed seals attributed to council members.
    pub const SEALS_RECOVERED: &'static str = "vrank_seals_recovered_total";
    /// Identifier for the counter of committed seals that failed signature recovery.
    pub const SEAL_RECOVERY_FAILURES: &'static str = "vrank_seal_recovery_failures_total";
    /// Identifier for the counter of committed seals recovered to non-members.
    pub const ORPHAN_SEALS: &'static str = "vrank_orphan_seals_total";
    /// Identifier for the gauge of the most recently scored window's start block.
    pub const SCORED_WINDOW_START: &'static str = "vrank_scored_window_start";

    /// Describes and zeroes all metrics.
    ///
    /// Does nothing unless the `metrics` feature is enabled.
    pub fn init() {
        #[cfg(feature = "metrics")]
        {
            Self::describe();
            Self::zero();
        }
    }

    #[cfg(feature = "metrics")]
    fn describe() {
        metrics::describe_counter!(
            Self::BLOCKS_PROCESSED,
            metrics::Unit::Count,
            "Headers turned into block participation records"
        );
        metrics::describe_counter!(
            Self::SEALS_RECOVERED,
            metrics::Unit::Count,
            "Committed seals attributed to council members"
        );
        metrics::describe_counter!(
            Self::SEAL_RECOVERY_FAILURES,
            metrics::Unit::Count,
            "Committed seals that failed signature recovery"
        );
        metrics::describe_counter!(
            Self::ORPHAN_SEALS,
            metrics::Unit::Count,
            "Committed seals recovered to addresses outside the council"
        );
        metrics::describe_gauge!(
            Self::SCORED_WINDOW_START,
            "Start block of the most recently scored window"
        );
    }

    #[cfg(feature = "metrics")]
    fn zero() {
        metrics::counter!(Self::BLOCKS_PROCESSED).increment(0);
        metrics::counter!(Self::SEALS_RECOVERED).increment(0);
        metrics::counter!(Self::SEAL_RECOVERY_FAILURES).increment(0);
        metrics::counter!(Self::ORPHAN_SEALS).increment(0);
        metrics::gauge!(Self::SCORED_WINDOW_START).set(0.0);
    }
}
