// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` filters (default `info`); output goes to stderr so stdout carries only the record.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
