//! timedflock: an advisory file lock with a timeout, held by a helper process.
//!
//! The calling process never holds the `flock` itself. [`TimedFileLock::acquire`]
//! spawns a holder process that takes the lock (blocking, non-blocking, or
//! with a deadline), reports success with a single `locked` line, and then
//! keeps the lock until told to release or until its requester dies. Because
//! the lock lives in another process, it behaves like a non-reentrant mutex
//! (or reader/writer lock) across unrelated processes, and a crashed caller
//! never leaves it held.
//!
//! Unix only: the holder relies on `flock(2)`, `setitimer(2)` and `SIGALRM`.

pub mod config;
pub mod error;
pub mod exit_codes;
pub mod holder;
pub mod logging;
pub mod protocol;
pub mod requester;
pub mod tag;

pub use config::{LockConfig, LockMode, Timeout};
pub use error::{FlockError, Result};
pub use requester::{HolderHandle, HolderProgram, LockOutcome, TimedFileLock};
pub use tag::LockTag;
