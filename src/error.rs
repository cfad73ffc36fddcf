//! Error types for timedflock.
//!
//! Uses thiserror for derive macros. Only the requester side ever surfaces
//! these to a caller; holder-side failures are logged and collapsed into the
//! absence of the handshake sentinel.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for timedflock operations.
#[derive(Error, Debug)]
pub enum FlockError {
    /// User provided invalid arguments (e.g. an empty command to run).
    #[error("{0}")]
    UserError(String),

    /// The lock configuration or command-line arguments are invalid.
    #[error("invalid lock configuration: {0}")]
    InvalidConfig(String),

    /// The holder process could not be created.
    #[error("failed to spawn lock holder: {0}")]
    Spawn(String),

    /// The holder started but the handshake could not be completed.
    #[error("lock holder handshake failed: {0}")]
    Handshake(String),

    /// Opening or locking the lock file failed inside the holder.
    #[error("lock syscall failed: {0}")]
    Syscall(String),

    /// A bounded wait expired before the lock was granted.
    #[error("timed out waiting for lock: {0}")]
    TimedOut(String),

    /// A non-blocking attempt found the lock held by someone else.
    #[error("lock is held by another process: {0}")]
    Denied(String),
}

impl FlockError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            FlockError::UserError(_) | FlockError::InvalidConfig(_) => exit_codes::USER_ERROR,
            FlockError::Spawn(_) | FlockError::Handshake(_) => exit_codes::SPAWN_FAILURE,
            FlockError::Syscall(_) | FlockError::TimedOut(_) | FlockError::Denied(_) => {
                exit_codes::LOCK_FAILURE
            }
        }
    }
}

/// Result type alias for timedflock operations.
pub type Result<T> = std::result::Result<T, FlockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_message_is_verbatim() {
        let err = FlockError::UserError("no command given".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        assert_eq!(err.to_string(), "no command given");
    }

    #[test]
    fn invalid_config_is_a_user_error() {
        let err = FlockError::InvalidConfig("negative timeout".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn spawn_and_handshake_share_exit_code() {
        let spawn = FlockError::Spawn("no such file".to_string());
        let handshake = FlockError::Handshake("broken pipe".to_string());
        assert_eq!(spawn.exit_code(), exit_codes::SPAWN_FAILURE);
        assert_eq!(handshake.exit_code(), exit_codes::SPAWN_FAILURE);
    }

    #[test]
    fn not_acquired_errors_are_lock_failures() {
        for err in [
            FlockError::Syscall("EIO".to_string()),
            FlockError::TimedOut("/tmp/a.lock".to_string()),
            FlockError::Denied("/tmp/a.lock".to_string()),
        ] {
            assert_eq!(err.exit_code(), exit_codes::LOCK_FAILURE);
        }
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = FlockError::TimedOut("/tmp/a.lock after 1.5s".to_string());
        assert_eq!(err.to_string(), "timed out waiting for lock: /tmp/a.lock after 1.5s");

        let err = FlockError::Spawn("permission denied".to_string());
        assert_eq!(err.to_string(), "failed to spawn lock holder: permission denied");
    }
}
