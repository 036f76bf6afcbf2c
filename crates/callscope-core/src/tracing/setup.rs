//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "CALLSCOPE_LOG";

/// Filter used when `CALLSCOPE_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "callscope=info";

/// Initialize the callscope tracing/logging system.
///
/// Reads `CALLSCOPE_LOG` for per-subsystem log levels, e.g.
/// `CALLSCOPE_LOG=callscope_analysis::call_graph=debug,callscope_analysis::scanner=warn`.
/// Output goes to stderr so command output on stdout stays clean.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    init_tracing_with_default(DEFAULT_FILTER);
}

/// Like [`init_tracing`], but with a caller-chosen fallback filter.
pub fn init_tracing_with_default(default_filter: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        // try_init: another subscriber may already be installed (tests, embedding).
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
