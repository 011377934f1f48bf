//! Tracing setup. Command output goes to stdout, logs go to stderr.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging from `SEEDFINDER_LOG` (e.g. `SEEDFINDER_LOG=seedfinder=debug`).
/// Falls back to `seedfinder=info`. Safe to call more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("SEEDFINDER_LOG")
            .unwrap_or_else(|_| EnvFilter::new("seedfinder=info"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .try_init();
    });
}
