use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable that enables logging.
pub const LOG_ENV_VAR: &str = "CHAIN_OPTIONS_LOG";

/// Initialize tracing to stderr.
///
/// Logging is disabled unless `CHAIN_OPTIONS_LOG` is set; its value is used as
/// the filter directive when `RUST_LOG` is absent (e.g. `CHAIN_OPTIONS_LOG=debug`).
/// Registry warnings about incompatible option flags are emitted at `warn`.
pub fn init_tracing() {
    let Some(directive) = std::env::var(LOG_ENV_VAR).ok() else {
        return;
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&directive))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}
