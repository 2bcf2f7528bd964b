//! Structured logging setup, span definitions and event types.

pub mod events;
pub mod spans;

use strand_core::config::ObservabilityConfig;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted for the filter directive.
pub const LOG_ENV_VAR: &str = "STRAND_LOG";

/// Initialize the tracing subscriber with structured JSON output.
///
/// Respects the `STRAND_LOG` environment variable for filtering.
/// Defaults to `info` level if not set.
pub fn init_tracing() {
    init_tracing_from_config(&ObservabilityConfig::default());
}

/// Initialize from config. `STRAND_LOG` still takes precedence over `log_level`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing_from_config(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let _ = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Initialize tracing with a custom filter string (for testing or embedding).
pub fn init_tracing_with_filter(filter: &str) {
    let filter = EnvFilter::new(filter);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .json()
        .try_init();
}
