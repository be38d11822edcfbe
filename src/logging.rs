//! Tracing subscriber setup. Logs go to stderr so CLI output on stdout stays machine-readable.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "lineup_optimizer=info";

static INIT: OnceLock<()> = OnceLock::new();

/// Install the global subscriber. Only the first call has effect; a subscriber installed by
/// someone else (e.g. a test harness) is left in place.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
