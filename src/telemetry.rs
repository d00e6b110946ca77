//! Logging setup for binaries embedding the orchestrator.
//!
//! The library itself only emits `tracing` events; nothing is printed until a
//! subscriber is installed. Verbosity follows `RUST_LOG`, for example:
//! - `info`: lifecycle only (connect, disconnect, shutdown)
//! - `quotefeed=debug`: every tick and publish
//! - `quotefeed=warn`: fetch failures only

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

const DEFAULT_FILTER: &str = "info,quotefeed=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs a compact human-readable formatter as the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_telemetry() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
}

/// Installs a JSON formatter as the global subscriber (for log aggregation).
pub fn init_telemetry_json() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().json().with_span_events(FmtSpan::CLOSE))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        let first = init_telemetry();
        assert!(init_telemetry_json().is_err() || first.is_err());
    }
}
