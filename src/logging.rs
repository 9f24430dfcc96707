//! Logging setup for the command-line tool
//!
//! Output goes to stderr and is filtered by `WMLTAG_LOG`:
//! - `WMLTAG_LOG=debug` - everything
//! - `WMLTAG_LOG=wmltag::dictionary=debug` - one module

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "WMLTAG_LOG";

/// Install the global subscriber. Does nothing if one is already set.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(filter);

    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
