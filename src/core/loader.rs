//! Merges raw pairs from several sources into one snapshot.

use crate::core::{EnvVar, RawEnvironment};
use crate::error::{ConfigError, Result};
use crate::sources::ConfigSource;

/// Loads and merges raw pairs from multiple sources.
///
/// Sources are merged in ascending priority order, so a higher priority
/// source overrides a lower one for the same variable. An empty value from a
/// higher priority source unsets the variable.
pub struct ConfigLoader {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigLoader {
    /// Create a new loader with no sources.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Add a configuration source.
    pub fn add_source(&mut self, source: Box<dyn ConfigSource>) {
        self.sources.push(source);
    }

    /// Load every source and merge the recognised variables.
    ///
    /// Names are matched case-insensitively; anything outside the recognised
    /// set is skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if no source was added or any source fails to load.
    pub fn load(&self) -> Result<RawEnvironment> {
        if self.sources.is_empty() {
            return Err(ConfigError::Load(
                "No configuration sources specified".to_string(),
            ));
        }

        let mut raw = RawEnvironment::new();
        for source in self.sorted() {
            let values = source.load().map_err(|e| {
                ConfigError::Load(format!("Failed to load source '{}': {}", source.name(), e))
            })?;

            let mut recognised = 0usize;
            for (name, value) in values {
                match EnvVar::from_name(&name.to_uppercase()) {
                    Some(key) => {
                        raw.set(key, value);
                        recognised += 1;
                    }
                    None => tracing::trace!(
                        source = %source.name(),
                        name = %name,
                        "skipping unrecognised variable"
                    ),
                }
            }
            tracing::debug!(source = %source.name(), recognised, "loaded configuration source");
        }

        Ok(raw)
    }

    /// Get the list of source names in priority order.
    pub fn source_names(&self) -> Vec<String> {
        self.sorted().iter().map(|s| s.name()).collect()
    }

    fn sorted(&self) -> Vec<&dyn ConfigSource> {
        let mut sorted: Vec<&dyn ConfigSource> = self.sources.iter().map(|s| s.as_ref()).collect();
        sorted.sort_by_key(|s| s.priority());
        sorted
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
