//! Configuration source trait.

use crate::error::Result;
use std::collections::HashMap;

/// A provider of raw `NAME -> value` pairs.
///
/// Sources only produce a snapshot; they never validate. Names are matched
/// against [`EnvVar`](crate::core::EnvVar) case-insensitively by the loader,
/// and names outside the recognised set are dropped there.
pub trait ConfigSource: Send + Sync {
    /// Load the raw pairs this source provides.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or holds values that
    /// are not scalars.
    fn load(&self) -> Result<HashMap<String, String>>;

    /// Get a human-readable name for this source (for logging/debugging).
    fn name(&self) -> String;

    /// Get the priority of this source (higher = takes precedence).
    ///
    /// Default priorities:
    /// - Process environment: 300
    /// - In-memory map: 200
    /// - File: 100
    fn priority(&self) -> i32 {
        100
    }
}
