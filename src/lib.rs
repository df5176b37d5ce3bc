// src/lib.rs
pub mod azure;
pub mod cli;
pub mod discovery;
mod error;
pub mod launch;
pub mod records;
pub mod select;

pub use error::{ApiError, Error, Result};

// Re-export tracing for use in other modules
pub use tracing;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber on stderr.
/// Uses RUST_LOG env var for filtering (defaults to warn so prompts stay clean).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}
