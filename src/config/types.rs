//! Lock mode and timeout types.

use crate::error::{FlockError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Which kind of advisory lock to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LockMode {
    /// Writer lock: excludes every other holder (default).
    #[default]
    Exclusive,
    /// Reader lock: compatible with other shared holders.
    Shared,
}

impl LockMode {
    /// Pick the mode from a `shared` flag.
    pub fn from_shared(shared: bool) -> Self {
        if shared {
            LockMode::Shared
        } else {
            LockMode::Exclusive
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LockMode::Exclusive => "exclusive",
            LockMode::Shared => "shared",
        }
    }
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How long the holder may wait for the lock.
///
/// On the wire this is `null` (infinite), `0` (non-blocking) or a positive
/// number of fractional seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "Option<f64>", into = "Option<f64>")]
pub enum Timeout {
    /// Block until the lock is granted.
    Infinite,
    /// Fail immediately if the lock is contended (default).
    #[default]
    NonBlocking,
    /// Block for at most this long.
    After(Duration),
}

impl Timeout {
    /// Build a timeout from fractional seconds.
    ///
    /// `0` means non-blocking. Negative, NaN and infinite values are rejected.
    pub fn from_secs_f64(secs: f64) -> Result<Self> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(FlockError::InvalidConfig(format!(
                "timeout must be a finite, non-negative number of seconds (got {})",
                secs
            )));
        }
        if secs == 0.0 {
            return Ok(Timeout::NonBlocking);
        }
        let duration = Duration::try_from_secs_f64(secs).map_err(|e| {
            FlockError::InvalidConfig(format!("timeout of {} seconds is out of range: {}", secs, e))
        })?;
        Ok(Timeout::After(duration))
    }

    /// Seconds as carried on the wire; `None` for an infinite wait.
    pub fn as_secs_f64(&self) -> Option<f64> {
        match self {
            Timeout::Infinite => None,
            Timeout::NonBlocking => Some(0.0),
            Timeout::After(d) => Some(d.as_secs_f64()),
        }
    }

    pub fn is_non_blocking(&self) -> bool {
        matches!(self, Timeout::NonBlocking)
    }
}

impl TryFrom<Option<f64>> for Timeout {
    type Error = FlockError;

    fn try_from(secs: Option<f64>) -> Result<Self> {
        match secs {
            None => Ok(Timeout::Infinite),
            Some(secs) => Timeout::from_secs_f64(secs),
        }
    }
}

impl From<Timeout> for Option<f64> {
    fn from(timeout: Timeout) -> Self {
        timeout.as_secs_f64()
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeout::Infinite => f.write_str("infinite"),
            Timeout::NonBlocking => f.write_str("non-blocking"),
            Timeout::After(d) => write!(f, "{}s", d.as_secs_f64()),
        }
    }
}
