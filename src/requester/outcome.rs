//! Result of one acquisition attempt.

use crate::config::LockConfig;
use crate::error::{FlockError, Result};
use std::fmt;

/// What happened when a [`TimedFileLock`](super::TimedFileLock) tried to acquire.
///
/// Contention and timeouts are ordinary outcomes, not errors. Only a failure
/// to start or talk to the holder is reported as `SpawnFailed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockOutcome {
    /// The holder took the lock and is keeping it.
    Acquired,
    /// A blocking or bounded wait ended without the lock.
    TimedOut,
    /// A non-blocking attempt found the lock held elsewhere.
    Denied,
    /// The holder could not be spawned or the handshake broke down.
    SpawnFailed(String),
}

impl LockOutcome {
    pub fn is_acquired(&self) -> bool {
        matches!(self, LockOutcome::Acquired)
    }

    /// Turn anything but `Acquired` into a [`FlockError`] naming the lock file.
    pub fn into_result(self, config: &LockConfig) -> Result<()> {
        let path = config.path().display();
        match self {
            LockOutcome::Acquired => Ok(()),
            LockOutcome::TimedOut => Err(FlockError::TimedOut(format!(
                "'{}' after {}",
                path,
                config.timeout()
            ))),
            LockOutcome::Denied => Err(FlockError::Denied(format!("'{}'", path))),
            LockOutcome::SpawnFailed(reason) => Err(FlockError::Spawn(reason)),
        }
    }
}

impl fmt::Display for LockOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockOutcome::Acquired => f.write_str("acquired"),
            LockOutcome::TimedOut => f.write_str("timed out"),
            LockOutcome::Denied => f.write_str("denied"),
            LockOutcome::SpawnFailed(reason) => write!(f, "spawn failed: {}", reason),
        }
    }
}
