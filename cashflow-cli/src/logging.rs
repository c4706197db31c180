use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber once. `RUST_LOG` wins over the configured filter.
/// Logs go to stderr so stdout stays clean JSON.
pub fn init_tracing(default_filter: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_filter))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
