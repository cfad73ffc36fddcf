//! Lock configuration for timedflock.
//!
//! A `LockConfig` describes what to lock and how: the absolute lock file
//! path, the lock mode, and how long to wait. It is immutable once built and
//! travels to the holder process as a single JSON argv element.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use model::LockConfig;
pub use types::{LockMode, Timeout};
