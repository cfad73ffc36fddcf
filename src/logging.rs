//! Tracing setup shared by both roles of the binary.
//!
//! Everything goes to stderr: a holder's stdout is the handshake channel and
//! must carry nothing but the sentinel line.

use crate::error::{FlockError, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `TIMEDFLOCK_LOG=debug`.
pub const LOG_ENV_VAR: &str = "TIMEDFLOCK_LOG";

/// Filter used when `TIMEDFLOCK_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Build the filter from `TIMEDFLOCK_LOG`, falling back to [`DEFAULT_FILTER`].
///
/// Holders inherit the requester's environment, so one setting covers both.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the global tracing subscriber.
///
/// # Errors
/// Returns an error if a subscriber is already installed.
pub fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| FlockError::UserError(format!("failed to initialize logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_fails_cleanly() {
        // The first call may already have lost to another test; the second always does.
        let _ = init_tracing();
        let err = init_tracing().unwrap_err();
        assert!(err.to_string().contains("failed to initialize logging"));
    }
}
