//! Tracing configuration for the command-line driver
//!
//! The library only emits trace events; subscriber setup happens here,
//! at the application boundary. `RUST_LOG` overrides the verbosity flag
//! when set.

use crate::error::{ChromaKeyError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map a `-v` occurrence count to a default filter directive.
#[must_use]
pub fn verbosity_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "chromakey=warn",
        1 => "chromakey=info",
        2 => "chromakey=debug",
        _ => "trace",
    }
}

/// Initialize the global tracing subscriber for CLI usage.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_cli_tracing(verbosity: u8) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_directive(verbosity)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(verbosity >= 2)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| ChromaKeyError::processing(format!("Failed to initialize tracing: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_directive_mapping() {
        assert_eq!(verbosity_directive(0), "chromakey=warn");
        assert_eq!(verbosity_directive(1), "chromakey=info");
        assert_eq!(verbosity_directive(2), "chromakey=debug");
        assert_eq!(verbosity_directive(3), "trace");
        assert_eq!(verbosity_directive(10), "trace");
    }
}
