//! Thin wrappers over `flock(2)` and the lock attempt itself.

use super::timer::{self, AlarmTimer};
use crate::config::{LockMode, Timeout};
use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind};
use std::os::unix::io::AsRawFd;
use std::path::Path;

/// How a lock attempt resolved, short of an I/O error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Acquired,
    /// Non-blocking attempt found the lock contended.
    Denied,
    /// Our own alarm interrupted a bounded wait.
    TimedOut,
}

/// Open the lock file, creating it if absent. Never truncates.
pub fn open_lock_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Try to take the lock in `mode`, honoring `timeout`.
///
/// `EINTR` is only treated as a timeout when the alarm flag is set; any
/// other interruption retries the call.
pub fn attempt(file: &File, mode: LockMode, timeout: Timeout) -> io::Result<AttemptOutcome> {
    let op = lock_op(mode);

    match timeout {
        Timeout::NonBlocking => loop {
            match flock(file, op | libc::LOCK_NB) {
                Ok(()) => return Ok(AttemptOutcome::Acquired),
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(AttemptOutcome::Denied),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        },
        Timeout::Infinite => wait_forever(file, op),
        Timeout::After(duration) if duration > timer::MAX_DEADLINE => wait_forever(file, op),
        Timeout::After(duration) => {
            // Disarmed when `timer` drops, on every exit path.
            let timer = AlarmTimer::arm(duration)?;
            loop {
                if timer.fired() {
                    return Ok(AttemptOutcome::TimedOut);
                }
                match flock(file, op) {
                    Ok(()) => return Ok(AttemptOutcome::Acquired),
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
        }
    }
}

fn wait_forever(file: &File, op: libc::c_int) -> io::Result<AttemptOutcome> {
    loop {
        match flock(file, op) {
            Ok(()) => return Ok(AttemptOutcome::Acquired),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Release the advisory lock held through `file`.
pub fn unlock(file: &File) -> io::Result<()> {
    flock(file, libc::LOCK_UN)
}

fn lock_op(mode: LockMode) -> libc::c_int {
    match mode {
        LockMode::Exclusive => libc::LOCK_EX,
        LockMode::Shared => libc::LOCK_SH,
    }
}

fn flock(file: &File, op: libc::c_int) -> io::Result<()> {
    // SAFETY: the descriptor is owned by `file` and stays open for the call.
    let rc = unsafe { libc::flock(file.as_raw_fd(), op) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}
