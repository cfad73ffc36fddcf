//! The lock holder process.
//!
//! A holder is a short-lived child process that owns the advisory lock on
//! behalf of its requester. It runs a small state machine:
//!
//! ```text
//! Init -> Attempting -> Acquired -> WaitingRelease -> Releasing -> Exited
//!                    \-> Failed ---------------------------------> Exited
//! ```
//!
//! Success is reported by writing `locked\n` to stdout. Failure is reported
//! by writing nothing at all, whatever the reason (contention, timeout, or an
//! I/O error on the lock file); the requester only ever sees "sentinel or no
//! sentinel".
//!
//! The attempt runs on the main thread. The liveness watcher runs on a
//! second thread with `SIGALRM` blocked, so the timeout alarm can only
//! interrupt the `flock` call it was armed for.

pub mod flock;
pub mod timer;
pub mod watcher;

use crate::config::LockConfig;
use crate::error::FlockError;
use crate::exit_codes;
use crate::protocol;
use flock::AttemptOutcome;
use std::io::{self, Read, Write};
use tracing::{debug, error, info, warn};
use watcher::Trigger;

/// States of the holder, in the order they are normally visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolderState {
    Init,
    Attempting,
    Acquired,
    WaitingRelease,
    Releasing,
    Failed,
    Exited,
}

/// How a holder run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolderExit {
    /// Lock was held and released on request.
    Released,
    /// Lock was never acquired; nothing was written.
    NotAcquired,
    /// Lock was acquired but the sentinel could not be delivered.
    HandshakeLost,
    /// The requester went away without releasing.
    ParentGone,
}

impl HolderExit {
    pub fn exit_code(&self) -> i32 {
        match self {
            HolderExit::ParentGone => exit_codes::PARENT_GONE,
            HolderExit::Released | HolderExit::NotAcquired | HolderExit::HandshakeLost => {
                exit_codes::SUCCESS
            }
        }
    }
}

/// Entry point for `timedflock hold <tag> <parent> <config>`.
///
/// Returns the process exit code. If the requester dies, the process exits
/// from the watcher thread and this function never returns.
pub fn run(tag: &str, parent: &str, config_json: &str) -> i32 {
    info!(tag, parent, "created holder process for lock");

    let config = match LockConfig::from_json(config_json) {
        Ok(config) => config,
        Err(e) => {
            error!(tag, error = %e, "refusing to hold lock");
            return exit_codes::USER_ERROR;
        }
    };

    let exit = hold(&config, io::stdin(), io::stdout(), || {
        std::process::exit(exit_codes::PARENT_GONE)
    });
    debug!(tag, ?exit, "holder finished");
    exit.exit_code()
}

/// Run the holder state machine against arbitrary pipes.
///
/// `input` is the requester's command channel, `output` the handshake
/// channel. `on_parent_gone` runs on the watcher thread when `input` closes
/// without a release token.
pub fn hold<R, W, F>(config: &LockConfig, input: R, output: W, on_parent_gone: F) -> HolderExit
where
    R: Read + Send + 'static,
    W: Write,
    F: FnOnce() + Send + 'static,
{
    let mut holder = Holder {
        config,
        state: HolderState::Init,
    };
    holder.run(input, output, on_parent_gone)
}

struct Holder<'a> {
    config: &'a LockConfig,
    state: HolderState,
}

impl Holder<'_> {
    fn advance(&mut self, next: HolderState) {
        debug!(from = ?self.state, to = ?next, "holder state change");
        self.state = next;
    }

    fn fail(&mut self) -> HolderExit {
        self.advance(HolderState::Failed);
        self.advance(HolderState::Exited);
        HolderExit::NotAcquired
    }

    fn run<R, W, F>(&mut self, input: R, mut output: W, on_parent_gone: F) -> HolderExit
    where
        R: Read + Send + 'static,
        W: Write,
        F: FnOnce() + Send + 'static,
    {
        let path = self.config.path();

        if let Err(e) = timer::install_alarm_handler() {
            error!(error = %e, "failed to install SIGALRM handler");
            return self.fail();
        }

        let watcher = timer::with_alarm_blocked(|| watcher::spawn_watcher(input, on_parent_gone));
        let signal = match watcher {
            Ok(Ok(signal)) => signal,
            Ok(Err(e)) | Err(e) => {
                error!(error = %e, "failed to start liveness watcher");
                return self.fail();
            }
        };

        let file = match flock::open_lock_file(path) {
            Ok(file) => file,
            Err(e) => {
                let err = FlockError::Syscall(format!("open '{}': {}", path.display(), e));
                warn!(error = %err, "failed to open lock file");
                return self.fail();
            }
        };

        self.advance(HolderState::Attempting);
        let mode = self.config.mode();
        let timeout = self.config.timeout();
        match flock::attempt(&file, mode, timeout) {
            Ok(AttemptOutcome::Acquired) => {}
            Ok(AttemptOutcome::Denied) => {
                info!(path = %path.display(), %mode, "lock is held elsewhere");
                return self.fail();
            }
            Ok(AttemptOutcome::TimedOut) => {
                info!(path = %path.display(), %mode, %timeout, "timed out waiting for lock");
                return self.fail();
            }
            Err(e) => {
                let err = FlockError::Syscall(format!("flock '{}': {}", path.display(), e));
                warn!(error = %err, "lock attempt failed");
                return self.fail();
            }
        }

        self.advance(HolderState::Acquired);
        if let Err(e) = output
            .write_all(protocol::LOCKED_LINE.as_bytes())
            .and_then(|()| output.flush())
        {
            warn!(error = %e, "failed to report lock to requester");
            if let Err(e) = flock::unlock(&file) {
                warn!(error = %e, "failed to unlock");
            }
            self.advance(HolderState::Exited);
            return HolderExit::HandshakeLost;
        }

        self.advance(HolderState::WaitingRelease);
        match signal.wait() {
            Trigger::Release => {
                self.advance(HolderState::Releasing);
                if let Err(e) = flock::unlock(&file) {
                    warn!(path = %path.display(), error = %e, "failed to unlock");
                }
                drop(file);
                self.advance(HolderState::Exited);
                HolderExit::Released
            }
            // No explicit unlock: closing the file on the way out is enough.
            Trigger::ParentGone => {
                self.advance(HolderState::Exited);
                HolderExit::ParentGone
            }
        }
    }
}
