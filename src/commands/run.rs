//! Implementation of the `timedflock run` command.

use super::{holder_program, lock_config};
use crate::cli::RunArgs;
use std::os::unix::process::ExitStatusExt;
use std::process::{Command, ExitStatus};
use timedflock::error::{FlockError, Result};
use timedflock::{TimedFileLock, exit_codes};
use tracing::debug;

/// Hold the lock for the lifetime of a child command.
///
/// The lock is released after the command exits, whatever its status.
pub fn cmd_run(args: RunArgs) -> Result<i32> {
    let argv = command_argv(args.command.as_deref(), &args.args)?;
    let config = lock_config(&args.lockfile, args.shared, args.timeout, args.wait)?;
    let tag = args.tag.unwrap_or_else(|| format!("run {}", argv[0]));

    let mut lock = TimedFileLock::new(config)
        .with_holder_program(holder_program()?)
        .with_tag(tag);
    lock.try_acquire()?;

    let status = Command::new(&argv[0]).args(&argv[1..]).status();
    lock.release();

    let status = status.map_err(|e| {
        FlockError::UserError(format!(
            "failed to execute '{}': {}\nFix: ensure the command is installed and in PATH.",
            argv[0], e
        ))
    })?;
    debug!(%status, "command finished");
    Ok(status_code(status))
}

/// Resolve the command to run from `-c` or the trailing arguments.
fn command_argv(command: Option<&str>, args: &[String]) -> Result<Vec<String>> {
    let argv = match command {
        Some(command) => shell_words::split(command).map_err(|e| {
            FlockError::UserError(format!(
                "failed to parse command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                command, e
            ))
        })?,
        None => args.to_vec(),
    };

    if argv.is_empty() {
        return Err(FlockError::UserError(
            "no command to run.\n\nUsage:\n  timedflock run <LOCKFILE> -- <COMMAND> [ARGS..]\n  \
             timedflock run <LOCKFILE> -c '<COMMAND LINE>'"
                .to_string(),
        ));
    }
    Ok(argv)
}

/// Exit code to pass through: the child's own, or `128 + signal` if killed.
fn status_code(status: ExitStatus) -> i32 {
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => exit_codes::USER_ERROR,
    }
}
