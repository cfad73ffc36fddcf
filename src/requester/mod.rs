//! Caller-facing side of the lock.
//!
//! A [`TimedFileLock`] never calls `flock` itself. Each acquisition spawns a
//! holder process, waits for its one-line handshake, and keeps the child as
//! the only witness that the lock is held:
//! - `acquire` spawns exactly one holder
//! - `release` sends the release token and waits for the holder to exit
//! - `locked` reports whether a holder handle is currently held
//!
//! # Staleness
//!
//! If a holder dies on its own (killed, crashed), `locked()` keeps returning
//! `true` until the next `release`, `acquire` or [`TimedFileLock::holder_alive`]
//! call notices. This window is accepted; the lock file itself is never
//! inspected.
//!
//! # Re-entrancy
//!
//! The lock is not re-entrant across handles. Two handles in one process on
//! the same path contend exactly like two processes, so acquiring a second
//! exclusive lock while holding the first blocks (or times out).

mod handle;
mod lock;
mod outcome;
mod spawn;


// Re-export public API
pub use handle::HolderHandle;
pub use lock::TimedFileLock;
pub use outcome::LockOutcome;
pub use spawn::HolderProgram;
