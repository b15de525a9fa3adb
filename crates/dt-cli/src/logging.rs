use std::sync::Once;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter, e.g. `DOCTHIS_LOG=dt_synth=debug`.
pub const LOG_ENV: &str = "DOCTHIS_LOG";

static INIT: Once = Once::new();

/// Install the global subscriber once. Logs go to stderr so stdout carries
/// only edits and traces.
pub fn init_tracing(json: bool) {
    INIT.call_once(|| {
        // `log` records from dependencies flow into tracing.
        let _ = tracing_log::LogTracer::init();

        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        let registry = tracing_subscriber::registry().with(filter);
        let result = if json {
            registry
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
        } else {
            registry
                .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                .try_init()
        };
        if let Err(e) = result {
            eprintln!("docthis: could not install log subscriber: {e}");
        }
    });
}
