//! Log output for test runs.
//!
//! The mocks emit `tracing` events as requests are created, events fire and
//! responses end. Call [`init_test_logging`] at the top of a test to see
//! them; output goes through the test harness writer, so it is captured
//! unless the test fails or `--nocapture` is passed.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "mockhttp=debug";

/// Installs a human-readable subscriber for tests.
///
/// Honours `RUST_LOG`, falling back to [`DEFAULT_FILTER`]. Returns `false`
/// if a global subscriber was already installed, which makes repeat calls
/// from many tests harmless.
pub fn init_test_logging() -> bool {
    init_with_filter(default_filter())
}

/// Installs a subscriber with an explicit filter such as
/// `"mockhttp=trace"`.
///
/// An invalid filter string falls back to [`DEFAULT_FILTER`].
pub fn init_test_logging_with(filter: &str) -> bool {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    init_with_filter(filter)
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn init_with_filter(filter: EnvFilter) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .with_target(true)
        .try_init()
        .is_ok()
}
