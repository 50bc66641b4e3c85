//! Support for tracing execution of a program.

use tracing_subscriber::{
    fmt::{format::FmtSpan, Subscriber},
    prelude::*,
    EnvFilter,
};

/// Directive used when `RUST_LOG` is unset or can't be parsed. Our standard
/// output belongs to tables and descriptions, so stay quiet unless asked.
const DEFAULT_DIRECTIVE: &str = "warn";

/// Set up the `tracing` library with reasonable options for a command-line
/// tool. All log output goes to standard error.
pub fn initialize_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(filter)
        .with_target(false)
        .finish()
        .init();
}
