//! Feature-gated metrics macros shared by the vrank crates.
//!
//! Each macro expands to nothing unless the calling crate enables its own `metrics` feature.
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

/// Sets a gauge value.
#[macro_export]
macro_rules! set {
    ($instrument:ident, $metric:expr, $amount:expr) => {
        #[cfg(feature = "metrics")]
        metrics::$instrument!($metric).set($amount);
    };
}

/// Increments a counter by one.
#[macro_export]
macro_rules! inc {
    ($instrument:ident, $metric:expr) => {
        #[cfg(feature = "metrics")]
        metrics::$instrument!($metric).increment(1);
    };
}

/// Increments a counter by an arbitrary amount.
#[macro_export]
macro_rules! add {
    ($instrument:ident, $metric:expr, $amount:expr) => {
        #[cfg(feature = "metrics")]
        metrics::$instrument!($metric).increment($amount);
    };
}
