//! Test log setup.

use tracing_subscriber::EnvFilter;

/// Install a `tracing` subscriber writing through the test harness.
///
/// The filter comes from `RUST_LOG` and defaults to `agree=debug`. Set
/// `AGREE_LOG_FORMAT=json` for JSON lines. Safe to call from every test:
/// only the first call installs a subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("agree=debug"));
    let json = std::env::var("AGREE_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let installed = if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
    };
    if installed.is_err() {
        tracing::trace!("tracing subscriber already installed");
    }
}
