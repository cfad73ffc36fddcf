//! Implementation of the hidden `timedflock hold` command.

use crate::cli::HoldArgs;
use timedflock::holder;

/// Become a lock holder. Returns the holder's exit code.
pub fn cmd_hold(args: HoldArgs) -> i32 {
    holder::run(&args.tag, &args.parent, &args.config)
}
