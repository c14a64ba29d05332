//! Shared helpers for runwatch integration tests.

pub mod backends;
pub mod builders;

use std::future::Future;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

/// Upper bound for any single awaited step in a test.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Route `tracing` output into the test harness.
///
/// Output is captured per test and only shown for failures (or with
/// `--nocapture`). The filter comes from `RUNWATCH_LOG` and defaults to
/// `info`. Calling this more than once is fine.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("RUNWATCH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Await `f`, panicking if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("test step timed out after {TEST_TIMEOUT:?}"),
    }
}
