#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use timedflock::{HolderProgram, LockConfig, TimedFileLock};

/// Path to the compiled `timedflock` binary.
pub fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_timedflock"))
}

pub fn holder_program() -> HolderProgram {
    HolderProgram::new(bin())
}

pub fn cli() -> Command {
    Command::new(bin())
}

pub struct LockDir {
    pub dir: TempDir,
}

impl LockDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("test.lock")
    }

    pub fn config(&self) -> LockConfig {
        LockConfig::new(self.path()).unwrap()
    }

    /// A lock handle that spawns the freshly built holder.
    pub fn lock(&self, config: LockConfig) -> TimedFileLock {
        TimedFileLock::new(config).with_holder_program(holder_program())
    }
}

/// Run `timedflock probe` and report whether the lock is free.
pub fn probe_available(path: &Path) -> bool {
    let output = cli().arg("probe").arg(path).output().unwrap();
    String::from_utf8_lossy(&output.stdout).trim() == "available"
}

/// Poll until `cond` holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(50));
    }
    cond()
}
