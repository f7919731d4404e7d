//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the default filter directive.
pub const LOG_ENV: &str = "FP_LOG";

const DEFAULT_FILTER: &str = "info";

/// Pick the filter directive: explicit value, then `FP_LOG`, then the
/// scenario's own setting, then `info`.
pub fn resolve_filter(explicit: Option<&str>, scenario: Option<&str>) -> String {
    explicit
        .map(str::to_owned)
        .or_else(|| std::env::var(LOG_ENV).ok())
        .or_else(|| scenario.map(str::to_owned))
        .unwrap_or_else(|| DEFAULT_FILTER.to_owned())
}

/// Install a formatting subscriber filtered by `directive`.
///
/// An unparsable directive falls back to `info`. Calling this twice is a no-op.
pub fn init_tracing(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|err| {
        eprintln!("invalid log filter {directive:?} ({err}); defaulting to {DEFAULT_FILTER}");
        EnvFilter::new(DEFAULT_FILTER)
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .ok();
}
