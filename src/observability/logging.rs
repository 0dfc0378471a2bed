//! Structured logging.
//!
//! Logs go to stderr; stdout is reserved for the verdict line read by the
//! orchestrator. The filter comes from `HEALTHCHECK_LOG`, then `RUST_LOG`,
//! and defaults to warnings only.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "HEALTHCHECK_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Install the global tracing subscriber.
pub fn init() {
    tracing_subscriber::registry()
        .with(filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
