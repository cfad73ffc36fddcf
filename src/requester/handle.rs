//! Requester-side handle on a live holder process.

use crate::protocol;
use crate::tag::LockTag;
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::io::Write;
use std::process::{Child, ChildStdin};
use tracing::{debug, warn};

/// A holder that completed the handshake and is keeping the lock.
///
/// Owned by exactly one [`TimedFileLock`](super::TimedFileLock). Dropping it
/// without [`release`](HolderHandle::release) closes the holder's stdin,
/// which the holder treats as its requester dying: it exits and the OS
/// drops the lock.
#[derive(Debug)]
pub struct HolderHandle {
    child: Child,
    stdin: Option<ChildStdin>,
    tag: LockTag,
    acquired_at: DateTime<Utc>,
}

impl HolderHandle {
    pub(super) fn new(mut child: Child, tag: LockTag) -> Self {
        let stdin = child.stdin.take();
        Self {
            child,
            stdin,
            tag,
            acquired_at: Utc::now(),
        }
    }

    /// Process ID of the holder.
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    pub fn tag(&self) -> &LockTag {
        &self.tag
    }

    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }

    /// How long the lock has been held.
    pub fn held_for(&self) -> Duration {
        Utc::now().signed_duration_since(self.acquired_at)
    }

    /// Format the hold time as a human-readable string.
    pub fn held_for_string(&self) -> String {
        let held = self.held_for();
        let seconds = held.num_seconds();
        let minutes = held.num_minutes();
        let hours = held.num_hours();

        if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds % 60)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Whether the holder process is still running.
    pub(super) fn is_running(&mut self) -> bool {
        match self.child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                debug!(pid = self.pid(), %status, "holder has exited");
                false
            }
            Err(e) => {
                warn!(pid = self.pid(), error = %e, "failed to poll holder process");
                false
            }
        }
    }

    /// Ask the holder to release and wait until it has exited.
    ///
    /// Returns once the advisory lock is really gone. Never fails; problems
    /// are logged.
    pub(super) fn release(mut self) {
        let pid = self.pid();
        if let Ok(Some(status)) = self.child.try_wait() {
            debug!(pid, %status, "holder already exited, nothing to release");
            return;
        }

        if let Some(mut stdin) = self.stdin.take() {
            // The holder may have died since the poll above; a broken pipe
            // here is harmless because we wait for the exit either way.
            if let Err(e) = stdin.write_all(protocol::RELEASE_TOKEN) {
                debug!(pid, error = %e, "failed to send release token");
            }
        }

        match self.child.wait() {
            Ok(status) => debug!(pid, %status, tag = %self.tag, "holder released lock"),
            Err(e) => warn!(pid, error = %e, "failed to wait for holder to exit"),
        }
    }
}

impl fmt::Display for HolderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (holder pid: {}, held: {})",
            self.tag,
            self.pid(),
            self.held_for_string()
        )
    }
}
