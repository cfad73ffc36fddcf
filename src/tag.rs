//! Diagnostic lock tags.
//!
//! A tag names a lock in holder log output. It is never used for
//! correctness; two locks with the same tag are still independent.

use std::fmt;
use std::panic::Location;

/// Human-readable identifier for a lock, shown in holder diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockTag(String);

impl LockTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Tag describing the source location that called this function.
    ///
    /// Functions that forward their own caller are marked `#[track_caller]`,
    /// so `TimedFileLock::new` reports the user's call site.
    #[track_caller]
    pub fn caller() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &Location<'_>) -> Self {
        let file = std::path::Path::new(location.file())
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| location.file().to_string());
        Self(format!("{}:{}:{}", file, location.line(), location.column()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LockTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for LockTag {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_tag_points_at_this_file() {
        let tag = LockTag::caller();
        assert!(tag.as_str().starts_with("tag.rs:"), "got {}", tag);
    }

    #[track_caller]
    fn forwarded() -> LockTag {
        LockTag::caller()
    }

    #[test]
    fn track_caller_forwards_location() {
        let line = line!() + 1;
        let tag = forwarded();
        assert!(tag.as_str().starts_with(&format!("tag.rs:{}:", line)), "got {}", tag);
    }

    #[test]
    fn explicit_tags_are_kept_verbatim() {
        assert_eq!(LockTag::from("db-migrate").to_string(), "db-migrate");
        assert_eq!(LockTag::from(String::from("x")).as_str(), "x");
    }
}
