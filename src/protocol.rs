//! Wire protocol between a requester and its holder process.
//!
//! The holder is started as `<program> [prefix..] hold -- <tag> <parent> <config>`.
//! On success it writes exactly [`LOCKED_LINE`] to stdout; on failure it
//! writes nothing and exits. The requester later writes [`RELEASE_TOKEN`] to
//! the holder's stdin and closes it. End-of-stream without the token means
//! the requester died.

use std::thread;

/// Subcommand name that puts the binary into holder mode.
pub const HOLD_SUBCOMMAND: &str = "hold";

/// The handshake line, including its newline.
pub const LOCKED_LINE: &str = "locked\n";

/// Bytes the requester sends for an orderly release.
pub const RELEASE_TOKEN: &[u8] = b"quit";

/// Whether a handshake line read from the holder signals success.
///
/// Compared as raw bytes; a holder that prints anything else, valid UTF-8
/// or not, simply did not acquire the lock.
pub fn is_locked_line(line: &[u8]) -> bool {
    line == LOCKED_LINE.as_bytes()
}

/// Whether the holder's full stdin contents are an orderly release request.
pub fn is_release_token(input: &[u8]) -> bool {
    input.trim_ascii() == RELEASE_TOKEN
}

/// Identity of the requesting process and thread, for holder diagnostics.
pub fn parent_identity() -> String {
    format!(
        "{} pid:{} tid:{:?}",
        get_owner_string(),
        std::process::id(),
        thread::current().id()
    )
}

/// `user@HOST` of the current process.
fn get_owner_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_exact_sentinel_is_success() {
        assert!(is_locked_line(b"locked\n"));
        assert!(!is_locked_line(b"locked"));
        assert!(!is_locked_line(b""));
        assert!(!is_locked_line(b"unlocked\n"));
        assert!(!is_locked_line(b"\xfflocked\n"));
    }

    #[test]
    fn release_token_tolerates_surrounding_whitespace() {
        assert!(is_release_token(b"quit"));
        assert!(is_release_token(b"quit\n"));
        assert!(is_release_token(b"  quit\r\n"));
    }

    #[test]
    fn anything_else_is_not_a_release() {
        assert!(!is_release_token(b""));
        assert!(!is_release_token(b"qui"));
        assert!(!is_release_token(b"quit quit"));
        assert!(!is_release_token(b"exit"));
    }

    #[test]
    fn parent_identity_names_this_process() {
        let id = parent_identity();
        assert!(id.contains(&format!("pid:{}", std::process::id())));
        assert!(id.contains('@'));
        assert!(id.contains("tid:ThreadId("));
    }
}
