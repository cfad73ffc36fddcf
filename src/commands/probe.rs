//! Implementation of the `timedflock probe` command.

use super::{holder_program, lock_config};
use crate::cli::ProbeArgs;
use timedflock::error::{FlockError, Result};
use timedflock::{LockOutcome, TimedFileLock, exit_codes};

/// Try the lock without waiting and report `available` or `locked`.
pub fn cmd_probe(args: ProbeArgs) -> Result<i32> {
    let config = lock_config(&args.lockfile, args.shared, None, false)?;
    let mut lock = TimedFileLock::new(config)
        .with_holder_program(holder_program()?)
        .with_tag("probe");

    match lock.acquire() {
        LockOutcome::Acquired => {
            lock.release();
            println!("available");
            Ok(exit_codes::SUCCESS)
        }
        LockOutcome::Denied | LockOutcome::TimedOut => {
            println!("locked");
            Ok(exit_codes::LOCK_FAILURE)
        }
        LockOutcome::SpawnFailed(reason) => Err(FlockError::Spawn(reason)),
    }
}
