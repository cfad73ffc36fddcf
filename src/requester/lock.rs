//! The `TimedFileLock` handle.

use super::handle::HolderHandle;
use super::outcome::LockOutcome;
use super::spawn::HolderProgram;
use crate::config::LockConfig;
use crate::error::{FlockError, Result};
use crate::protocol;
use crate::tag::LockTag;
use std::io::{BufRead, BufReader};
use std::process::Child;
use tracing::{debug, info, warn};

/// An advisory file lock held on the caller's behalf by a helper process.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use timedflock::{LockConfig, TimedFileLock};
///
/// let config = LockConfig::new("/tmp/app.lock")?.wait_for(Duration::from_millis(5500));
/// let mut lock = TimedFileLock::new(config);
/// if lock.acquire().is_acquired() {
///     // locked code here
///     lock.release();
/// } else {
///     // not locked
/// }
/// # Ok::<(), timedflock::FlockError>(())
/// ```
#[derive(Debug)]
pub struct TimedFileLock {
    config: LockConfig,
    tag: LockTag,
    program: Option<HolderProgram>,
    holder: Option<HolderHandle>,
}

impl TimedFileLock {
    /// Create an unlocked handle. The default tag is the caller's source location.
    #[track_caller]
    pub fn new(config: LockConfig) -> Self {
        Self {
            config,
            tag: LockTag::caller(),
            program: None,
            holder: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<LockTag>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Use a specific holder executable instead of [`HolderProgram::resolve`].
    pub fn with_holder_program(mut self, program: HolderProgram) -> Self {
        self.program = Some(program);
        self
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    pub fn tag(&self) -> &LockTag {
        &self.tag
    }

    /// The live holder, if the lock is believed held.
    pub fn holder(&self) -> Option<&HolderHandle> {
        self.holder.as_ref()
    }

    /// True iff a holder handle is held. See the module docs on staleness.
    pub fn locked(&self) -> bool {
        self.holder.is_some()
    }

    /// Check the holder is still running, dropping a stale handle if not.
    pub fn holder_alive(&mut self) -> bool {
        let Some(holder) = self.holder.as_mut() else {
            return false;
        };
        if holder.is_running() {
            return true;
        }

        if let Some(holder) = self.holder.take() {
            warn!(
                pid = holder.pid(),
                tag = %self.tag,
                "lock holder exited while the lock was believed held"
            );
        }
        false
    }

    /// Spawn a holder and wait for its verdict.
    ///
    /// Blocks for as long as the configured timeout allows. On anything but
    /// `Acquired` no holder is left running. Acquiring on a handle that
    /// already holds the lock returns `Acquired` without spawning again.
    pub fn acquire(&mut self) -> LockOutcome {
        if self.holder_alive() {
            debug!(tag = %self.tag, "lock already held by this handle");
            return LockOutcome::Acquired;
        }

        let program = match &self.program {
            Some(program) => program.clone(),
            None => match HolderProgram::resolve() {
                Ok(program) => program,
                Err(e) => return LockOutcome::SpawnFailed(e.to_string()),
            },
        };

        let config_json = match self.config.to_json() {
            Ok(json) => json,
            Err(e) => return LockOutcome::SpawnFailed(e.to_string()),
        };

        let mut child =
            match program.spawn(&self.tag, &protocol::parent_identity(), &config_json) {
                Ok(child) => child,
                Err(e) => {
                    warn!(tag = %self.tag, error = %e, "could not start lock holder");
                    return LockOutcome::SpawnFailed(e.to_string());
                }
            };

        match read_handshake(&mut child) {
            Ok(true) => {
                let holder = HolderHandle::new(child, self.tag.clone());
                info!(
                    path = %self.config.path().display(),
                    mode = %self.config.mode(),
                    pid = holder.pid(),
                    tag = %self.tag,
                    "lock acquired"
                );
                self.holder = Some(holder);
                LockOutcome::Acquired
            }
            Ok(false) => {
                // Closing stdin makes even a confused holder give up.
                drop(child.stdin.take());
                if let Err(e) = child.wait() {
                    warn!(error = %e, "failed to reap lock holder");
                }
                let outcome = if self.config.timeout().is_non_blocking() {
                    LockOutcome::Denied
                } else {
                    LockOutcome::TimedOut
                };
                debug!(
                    path = %self.config.path().display(),
                    timeout = %self.config.timeout(),
                    %outcome,
                    "lock not acquired"
                );
                outcome
            }
            Err(e) => {
                warn!(tag = %self.tag, error = %e, "lock handshake failed");
                kill_process(&mut child);
                LockOutcome::SpawnFailed(e.to_string())
            }
        }
    }

    /// Like [`acquire`](Self::acquire), but any outcome other than
    /// `Acquired` becomes an error.
    pub fn try_acquire(&mut self) -> Result<()> {
        self.acquire().into_result(&self.config)
    }

    /// Release the lock if held. Idempotent and infallible.
    ///
    /// Waits for the holder to exit, so the advisory lock is gone by the
    /// time this returns.
    pub fn release(&mut self) {
        if let Some(holder) = self.holder.take() {
            holder.release();
        }
    }
}

impl Drop for TimedFileLock {
    fn drop(&mut self) {
        self.release();
    }
}

/// Read the holder's one-line verdict.
///
/// `Ok(false)` covers end-of-stream and any line other than the sentinel.
fn read_handshake(child: &mut Child) -> Result<bool> {
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| FlockError::Handshake("holder stdout was not captured".to_string()))?;

    let mut line = Vec::new();
    BufReader::new(stdout)
        .read_until(b'\n', &mut line)
        .map_err(|e| FlockError::Handshake(format!("failed to read from holder: {}", e)))?;

    Ok(protocol::is_locked_line(&line))
}

/// Kill a process and wait for it to terminate.
fn kill_process(child: &mut Child) {
    // On Unix this is SIGKILL. A holder that never got the lock holds
    // nothing; one that did loses it with the process.
    let _ = child.kill();
    let _ = child.wait();
}
