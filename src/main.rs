//! timedflock: advisory file locks with a timeout, held by a helper process.
//!
//! This is the main entry point for the `timedflock` CLI. The same binary is
//! the user-facing tool (`run`, `probe`) and the lock holder (`hold`), which
//! requesters spawn with piped stdin/stdout.

mod cli;
mod commands;

use cli::Cli;
use std::process::ExitCode;
use timedflock::logging;

fn main() -> ExitCode {
    let cli = match Cli::parse_args() {
        Ok(cli) => cli,
        Err(code) => return code,
    };

    if let Err(e) = logging::init_tracing() {
        eprintln!("Warning: {}", e);
    }

    match commands::dispatch(cli.command) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

