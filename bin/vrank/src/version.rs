//! Version information for vrank.

/// The short version information for vrank.
pub(crate) const SHORT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The long version information for vrank.
pub(crate) const LONG_VERSION: &str = concat!(
    "Version: ",
    env!("CARGO_PKG_VERSION"),
    "\n",
    "Rust Version: ",
    env!("CARGO_PKG_RUST_VERSION"),
);
