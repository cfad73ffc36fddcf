//! LockConfig struct definition.

use super::types::{LockMode, Timeout};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Immutable description of one lock acquisition.
///
/// Build it with [`LockConfig::new`], which makes the path absolute, then
/// adjust the mode and timeout with the `shared`/`exclusive`/`timeout`
/// builders. The holder receives it serialized as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LockConfig {
    /// Absolute path of the lock file. Created if absent, never truncated.
    pub(super) path: PathBuf,

    /// Exclusive (writer) or shared (reader) lock.
    #[serde(default)]
    pub(super) mode: LockMode,

    /// `null` blocks forever, `0` is non-blocking, `>0` is a bounded wait.
    #[serde(default)]
    pub(super) timeout: Timeout,
}
