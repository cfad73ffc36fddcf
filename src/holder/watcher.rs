//! Liveness watcher.
//!
//! Reads the holder's stdin to end-of-stream on its own thread. The
//! requester either writes the release token and closes the pipe, or dies,
//! in which case the kernel closes its end for it. No heartbeat is needed.

use crate::protocol;
use std::io::{self, Read};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use tracing::{info, warn};

/// What woke the holder's main flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The requester sent the release token.
    Release,
    /// The requester's end of the pipe closed without a token.
    ParentGone,
}

/// Receiving side of the watcher's single exit signal.
#[derive(Debug)]
pub struct ReleaseSignal {
    rx: Receiver<()>,
}

impl ReleaseSignal {
    /// Park until the watcher reports an outcome.
    pub fn wait(&self) -> Trigger {
        match self.rx.recv() {
            Ok(()) => Trigger::Release,
            Err(_) => Trigger::ParentGone,
        }
    }
}

/// Start watching `input` for the release token.
///
/// On end-of-stream without the token `on_parent_gone` runs on the watcher
/// thread before the main flow is woken. The holder passes a closure that
/// exits the process, so the lock is dropped by the OS even if the main flow
/// is still blocked inside `flock`.
pub fn spawn_watcher<R, F>(mut input: R, on_parent_gone: F) -> io::Result<ReleaseSignal>
where
    R: Read + Send + 'static,
    F: FnOnce() + Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    thread::Builder::new()
        .name("liveness-watcher".to_string())
        .spawn(move || {
            let mut data = Vec::new();
            if let Err(e) = input.read_to_end(&mut data) {
                warn!(error = %e, "failed to read from requester pipe");
            }

            if protocol::is_release_token(&data) {
                info!("received quit command");
                let _ = tx.send(());
            } else {
                warn!("parent process has quit");
                on_parent_gone();
                drop(tx);
            }
        })?;

    Ok(ReleaseSignal { rx })
}
