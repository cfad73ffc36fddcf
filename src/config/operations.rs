//! LockConfig construction, validation, and wire encoding.

use super::model::LockConfig;
use super::types::{LockMode, Timeout};
use crate::error::{FlockError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

impl LockConfig {
    /// Create an exclusive, non-blocking configuration for `path`.
    ///
    /// A relative path is resolved against the current working directory so
    /// the holder, which may run elsewhere, locks the same file.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(FlockError::InvalidConfig(
                "lock file path must not be empty".to_string(),
            ));
        }

        let path = std::path::absolute(path).map_err(|e| {
            FlockError::InvalidConfig(format!(
                "failed to resolve lock file path '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self {
            path,
            mode: LockMode::default(),
            timeout: Timeout::default(),
        })
    }

    /// Request a shared (reader) lock.
    pub fn shared(mut self) -> Self {
        self.mode = LockMode::Shared;
        self
    }

    /// Request an exclusive (writer) lock.
    pub fn exclusive(mut self) -> Self {
        self.mode = LockMode::Exclusive;
        self
    }

    pub fn with_mode(mut self, mode: LockMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bounded wait; a zero duration means non-blocking.
    pub fn wait_for(self, timeout: Duration) -> Self {
        if timeout.is_zero() {
            self.with_timeout(Timeout::NonBlocking)
        } else {
            self.with_timeout(Timeout::After(timeout))
        }
    }

    /// Fail immediately if another process holds a conflicting lock.
    pub fn non_blocking(self) -> Self {
        self.with_timeout(Timeout::NonBlocking)
    }

    /// Block until the lock is granted. Use with caution.
    pub fn wait_forever(self) -> Self {
        self.with_timeout(Timeout::Infinite)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> LockMode {
        self.mode
    }

    pub fn timeout(&self) -> Timeout {
        self.timeout
    }

    /// Validate values that deserialization alone cannot enforce.
    ///
    /// Validation rules:
    /// - `path` must be absolute
    pub fn validate(&self) -> Result<()> {
        if !self.path.is_absolute() {
            return Err(FlockError::InvalidConfig(format!(
                "lock file path must be absolute (got '{}')",
                self.path.display()
            )));
        }
        Ok(())
    }

    /// Serialize to the single-line JSON passed to the holder.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            FlockError::InvalidConfig(format!("failed to serialize lock config: {}", e))
        })
    }

    /// Parse and validate the JSON form produced by [`LockConfig::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LockConfig = serde_json::from_str(json).map_err(|e| {
            FlockError::InvalidConfig(format!("failed to parse lock config JSON: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    #[cfg(test)]
    pub(crate) fn with_raw_path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }
}
