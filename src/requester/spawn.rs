//! Locating and starting the holder executable.

use crate::error::{FlockError, Result};
use crate::protocol;
use crate::tag::LockTag;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// Name of the binary that implements the holder.
pub const HOLDER_BIN_NAME: &str = "timedflock";

/// Environment variable that overrides holder discovery.
pub const HOLDER_ENV_VAR: &str = "TIMEDFLOCK_HOLDER";

/// The executable (plus leading arguments) that runs a holder.
///
/// The holder is launched as `<program> [args..] hold -- <tag> <parent> <config>`.
/// Binaries that embed the holder by dispatching the `hold` subcommand to
/// [`crate::holder::run`] can point this at themselves with
/// [`HolderProgram::current_exe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolderProgram {
    program: PathBuf,
    args: Vec<OsString>,
}

impl HolderProgram {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Arguments placed before the `hold` subcommand.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The currently running executable.
    pub fn current_exe() -> Result<Self> {
        env::current_exe().map(Self::new).map_err(|e| {
            FlockError::Spawn(format!("failed to locate the current executable: {}", e))
        })
    }

    /// Find the holder binary.
    ///
    /// Lookup order:
    /// 1. `TIMEDFLOCK_HOLDER` if set and non-empty
    /// 2. a `timedflock` binary next to the current executable
    /// 3. `timedflock` on `PATH`
    pub fn resolve() -> Result<Self> {
        if let Some(program) = env::var_os(HOLDER_ENV_VAR).filter(|v| !v.is_empty()) {
            return Ok(Self::new(program));
        }

        if let Ok(exe) = env::current_exe()
            && let Some(dir) = exe.parent()
        {
            let sibling = dir.join(HOLDER_BIN_NAME);
            if sibling.is_file() {
                return Ok(Self::new(sibling));
            }
        }

        which::which(HOLDER_BIN_NAME).map(Self::new).map_err(|e| {
            FlockError::Spawn(format!(
                "could not find the '{}' holder binary: {}\n\
                 Fix: install it on PATH or set {} to its location.",
                HOLDER_BIN_NAME, e, HOLDER_ENV_VAR
            ))
        })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Build the holder command with piped stdin/stdout.
    ///
    /// stderr is inherited so holder diagnostics reach the requester's
    /// terminal or log.
    pub(crate) fn command(&self, tag: &LockTag, parent: &str, config_json: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(protocol::HOLD_SUBCOMMAND)
            .arg("--")
            .arg(tag.as_str())
            .arg(parent)
            .arg(config_json)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        command
    }

    pub(crate) fn spawn(&self, tag: &LockTag, parent: &str, config_json: &str) -> Result<Child> {
        self.command(tag, parent, config_json).spawn().map_err(|e| {
            FlockError::Spawn(format!(
                "failed to execute holder '{}': {}",
                self.program.display(),
                e
            ))
        })
    }
}
