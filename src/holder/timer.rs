//! Timeout enforcement for blocking `flock` calls.
//!
//! A bounded wait arms `ITIMER_REAL`. The `SIGALRM` handler is installed
//! without `SA_RESTART`, so a `flock` blocked on the main thread returns
//! `EINTR`; the handler's only other effect is setting [`ALARM_FIRED`], which
//! is how the attempt tells its own timeout apart from unrelated signals.
//!
//! The timer keeps re-firing every [`REFIRE_INTERVAL`] until disarmed. If the
//! first signal lands between the flag check and the syscall, the next one
//! still interrupts the wait.

use std::io;
use std::mem;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Re-fire period after the initial deadline.
pub const REFIRE_INTERVAL: Duration = Duration::from_millis(50);

/// Longest deadline handed to `setitimer`. POSIX only guarantees
/// 100,000,000 seconds; longer waits are treated as unbounded.
pub const MAX_DEADLINE: Duration = Duration::from_secs(100_000_000);

static ALARM_FIRED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_alarm(_signum: libc::c_int) {
    ALARM_FIRED.store(true, Ordering::SeqCst);
}

/// Install the `SIGALRM` handler for this process.
pub fn install_alarm_handler() -> io::Result<()> {
    // SAFETY: `action` is fully initialized before use and the handler only
    // touches an atomic, which is async-signal-safe.
    unsafe {
        let mut action: libc::sigaction = mem::zeroed();
        action.sa_sigaction = on_alarm as extern "C" fn(libc::c_int) as libc::sighandler_t;
        action.sa_flags = 0;
        libc::sigemptyset(&mut action.sa_mask);
        if libc::sigaction(libc::SIGALRM, &action, ptr::null_mut()) != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

/// Run `f` with `SIGALRM` blocked on the calling thread.
///
/// Threads spawned inside `f` inherit the blocked mask, which keeps the alarm
/// from being delivered anywhere but the thread doing the lock attempt.
pub fn with_alarm_blocked<T>(f: impl FnOnce() -> T) -> io::Result<T> {
    // SAFETY: both sets are initialized by sigemptyset/pthread_sigmask
    // before being read.
    let previous = unsafe {
        let mut block: libc::sigset_t = mem::zeroed();
        let mut previous: libc::sigset_t = mem::zeroed();
        libc::sigemptyset(&mut block);
        libc::sigaddset(&mut block, libc::SIGALRM);
        let rc = libc::pthread_sigmask(libc::SIG_BLOCK, &block, &mut previous);
        if rc != 0 {
            return Err(io::Error::from_raw_os_error(rc));
        }
        previous
    };

    let result = f();

    // SAFETY: restores the mask captured above.
    let rc = unsafe { libc::pthread_sigmask(libc::SIG_SETMASK, &previous, ptr::null_mut()) };
    if rc != 0 {
        return Err(io::Error::from_raw_os_error(rc));
    }
    Ok(result)
}

/// An armed real-time timer. Dropping it disarms the timer.
#[derive(Debug)]
pub struct AlarmTimer {
    _armed: (),
}

impl AlarmTimer {
    /// Clear the fired flag and arm the timer to go off after `deadline`.
    pub fn arm(deadline: Duration) -> io::Result<Self> {
        ALARM_FIRED.store(false, Ordering::SeqCst);
        set_timer(deadline.max(Duration::from_micros(1)), REFIRE_INTERVAL)?;
        Ok(Self { _armed: () })
    }

    /// Whether our alarm has gone off since [`AlarmTimer::arm`].
    pub fn fired(&self) -> bool {
        ALARM_FIRED.load(Ordering::SeqCst)
    }
}

impl Drop for AlarmTimer {
    fn drop(&mut self) {
        if let Err(e) = set_timer(Duration::ZERO, Duration::ZERO) {
            tracing::warn!(error = %e, "failed to disarm lock timeout timer");
        }
    }
}

fn set_timer(value: Duration, interval: Duration) -> io::Result<()> {
    let spec = libc::itimerval {
        it_interval: to_timeval(interval),
        it_value: to_timeval(value),
    };
    // SAFETY: `spec` is a valid itimerval and the old value is not requested.
    let rc = unsafe { libc::setitimer(libc::ITIMER_REAL, &spec, ptr::null_mut()) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

fn to_timeval(duration: Duration) -> libc::timeval {
    libc::timeval {
        tv_sec: libc::time_t::try_from(duration.as_secs()).unwrap_or(libc::time_t::MAX),
        tv_usec: duration.subsec_micros() as libc::suseconds_t,
    }
}
