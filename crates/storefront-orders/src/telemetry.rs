//! Tracing setup for binaries and tests.

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber filtered by `filter` (an `EnvFilter`
/// directive such as `info,storefront_db=debug`).
///
/// Safe to call more than once; only the first call installs anything.
/// An unparsable directive falls back to `info`.
pub fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
