//! Structured logging using **tracing**.
//!
//! The registry emits `debug!` events on discovery and materialization and
//! `trace!` events on cache hits. Nothing is printed unless a subscriber is
//! installed.

use tracing::{info, warn};

/// Initializes the global tracing subscriber.
///
/// Call *once* at program start. Writes JSON lines to stderr so stdout stays
/// clean for command output.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=enumkit_core=debug`)
pub fn init_structured_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Logs a warning event.
pub fn log_warn(message: &str) {
    warn!(detail = %message);
}

/// Logs an info event.
pub fn log_info(message: &str) {
    info!(detail = %message);
}
