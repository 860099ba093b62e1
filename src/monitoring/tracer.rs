/*!
 * Structured Tracing
 *
 * The containers and the pool emit `tracing` events (resizes, worker
 * lifecycle, task failures). Nothing is printed until the embedding program
 * installs a subscriber; [`init_tracing`] installs the default one.
 */

use tracing::info;
use tracing_subscriber::{
    fmt::format::FmtSpan,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

/// Environment variable switching the output to JSON lines
pub const TRACE_JSON_ENV: &str = "SYNC_TRACE_JSON";

/// Install the global tracing subscriber
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SYNC_TRACE_JSON: Enable JSON output (default: false)
///
/// Returns an error when a global subscriber is already installed.
pub fn init_tracing() -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if json_requested() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init()?;
        info!("tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()?;
        info!("tracing initialized");
    }

    Ok(())
}

fn json_requested() -> bool {
    std::env::var(TRACE_JSON_ENV)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false)
}
