//! CLI argument parsing for timedflock.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use timedflock::exit_codes;

/// timedflock: advisory file locks with a timeout, held by a helper process.
///
/// The lock is taken with flock(2) by a dedicated holder process, so a
/// crashed caller can never leave it held.
#[derive(Parser, Debug)]
#[command(name = "timedflock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for timedflock.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a command while holding a lock.
    ///
    /// Acquires the lock, runs the command, releases the lock, and exits
    /// with the command's exit code.
    Run(RunArgs),

    /// Check whether a lock could be taken right now.
    ///
    /// Makes a non-blocking attempt and releases immediately on success.
    Probe(ProbeArgs),

    /// Internal: hold a lock on behalf of a requester.
    #[command(hide = true)]
    Hold(HoldArgs),
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Lock file to hold (created if absent, never truncated).
    pub lockfile: PathBuf,

    /// Take a shared (reader) lock instead of an exclusive one.
    #[arg(short, long)]
    pub shared: bool,

    /// Seconds to wait for the lock; 0 fails immediately when contended.
    #[arg(short, long, conflicts_with = "wait")]
    pub timeout: Option<f64>,

    /// Wait for the lock indefinitely.
    #[arg(short, long)]
    pub wait: bool,

    /// Name for the lock in holder diagnostics.
    #[arg(long)]
    pub tag: Option<String>,

    /// Command line to run, split with POSIX shell quoting rules.
    #[arg(short = 'c', long = "command", conflicts_with = "args")]
    pub command: Option<String>,

    /// Command and arguments to run (after `--`).
    #[arg(last = true)]
    pub args: Vec<String>,
}

/// Arguments for the `probe` command.
#[derive(Parser, Debug)]
pub struct ProbeArgs {
    /// Lock file to probe (created if absent).
    pub lockfile: PathBuf,

    /// Probe for a shared (reader) lock.
    #[arg(short, long)]
    pub shared: bool,
}

/// Arguments for the hidden `hold` command.
#[derive(Parser, Debug)]
pub struct HoldArgs {
    /// Diagnostic tag of the lock.
    pub tag: String,

    /// Identity of the requesting process.
    pub parent: String,

    /// Lock configuration as JSON.
    pub config: String,
}

impl Cli {
    /// Parse command-line arguments.
    ///
    /// Usage errors exit with `USER_ERROR` rather than clap's default of 2,
    /// which is reserved for "lock not acquired".
    pub fn parse_args() -> std::result::Result<Self, ExitCode> {
        Cli::try_parse().map_err(|e| {
            let _ = e.print();
            let code = if e.use_stderr() {
                exit_codes::USER_ERROR
            } else {
                exit_codes::SUCCESS
            };
            ExitCode::from(code as u8)
        })
    }
}
