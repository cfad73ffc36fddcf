//! Exit code constants for the timedflock binary.
//!
//! The same binary runs in two roles, so the codes cover both:
//! - 0: Success (the holder also exits 0 on every orderly terminal state)
//! - 1: User error (bad args, invalid lock configuration)
//! - 2: Lock not acquired (timed out or denied)
//! - 3: Holder process could not be spawned or handshaked with
//! - 4: Holder self-terminated because its requester went away

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or an invalid lock configuration.
pub const USER_ERROR: i32 = 1;

/// The lock could not be acquired within the configured timeout.
pub const LOCK_FAILURE: i32 = 2;

/// The holder process could not be started or did not complete the handshake.
pub const SPAWN_FAILURE: i32 = 3;

/// Holder only: the requester's end of the stdin pipe closed without a release token.
pub const PARENT_GONE: i32 = 4;
