//! Command implementations for timedflock.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Every handler returns the process exit code on success.

mod hold;
mod probe;
mod run;

use crate::cli::Command;
use std::path::Path;
use timedflock::error::Result;
use timedflock::{HolderProgram, LockConfig, LockMode, Timeout};

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<i32> {
    match command {
        Command::Run(args) => run::cmd_run(args),
        Command::Probe(args) => probe::cmd_probe(args),
        Command::Hold(args) => Ok(hold::cmd_hold(args)),
    }
}

/// Build a lock configuration from the common CLI flags.
///
/// No `--timeout` and no `--wait` means non-blocking.
fn lock_config(
    lockfile: &Path,
    shared: bool,
    timeout: Option<f64>,
    wait: bool,
) -> Result<LockConfig> {
    let timeout = match (wait, timeout) {
        (true, _) => Timeout::Infinite,
        (false, Some(secs)) => Timeout::from_secs_f64(secs)?,
        (false, None) => Timeout::NonBlocking,
    };

    Ok(LockConfig::new(lockfile)?
        .with_mode(LockMode::from_shared(shared))
        .with_timeout(timeout))
}

/// This binary is its own holder.
fn holder_program() -> Result<HolderProgram> {
    HolderProgram::current_exe()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use timedflock::exit_codes;

    #[test]
    fn lock_config_defaults_to_non_blocking_exclusive() {
        let config = lock_config(Path::new("/tmp/a.lock"), false, None, false).unwrap();
        assert_eq!(config.mode(), LockMode::Exclusive);
        assert_eq!(config.timeout(), Timeout::NonBlocking);
    }

    #[test]
    fn lock_config_maps_flags() {
        let config = lock_config(Path::new("/tmp/a.lock"), true, Some(1.25), false).unwrap();
        assert_eq!(config.mode(), LockMode::Shared);
        assert_eq!(config.timeout(), Timeout::After(Duration::from_millis(1250)));

        let config = lock_config(Path::new("/tmp/a.lock"), false, None, true).unwrap();
        assert_eq!(config.timeout(), Timeout::Infinite);
    }

    #[test]
    fn lock_config_rejects_out_of_range_timeout() {
        let err = lock_config(Path::new("/tmp/a.lock"), false, Some(1e20), false).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn lock_config_rejects_negative_timeout() {
        let err = lock_config(Path::new("/tmp/a.lock"), false, Some(-2.0), false).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }
}
