//! File-based configuration source.

use super::ConfigSource;
use crate::error::{ConfigError, Result};
use config::{File, ValueKind};
use std::collections::HashMap;
use std::path::PathBuf;

/// Flat file of environment variable values.
///
/// The file holds top-level `NAME: value` pairs in YAML, TOML, or JSON,
/// detected from the extension. Numbers and booleans are read back as their
/// string form and a blank or `null` value as an empty string, which leaves
/// the variable unset. Nested tables and arrays are rejected.
///
/// # Examples
///
/// ```rust,no_run
/// use podwatch_config::sources::FileSource;
///
/// let source = FileSource::new("/etc/podwatch/env.yaml");
/// ```
pub struct FileSource {
    path: PathBuf,
    priority: i32,
}

impl FileSource {
    /// Create a new file source with automatic format detection.
    ///
    /// The format is detected from the file extension:
    /// - `.yaml`, `.yml` -> YAML
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    ///
    /// Each format is only available when its cargo feature is enabled.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            priority: 100,
        }
    }

    /// Set the priority for this source.
    ///
    /// Higher priority sources override lower priority ones.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Validate that the file extension is supported by the enabled features.
    fn validate_extension(&self) -> Result<()> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ConfigError::Load(format!(
                    "Unable to determine file format for: {}",
                    self.path.display()
                ))
            })?;

        let supported = match extension {
            "yaml" | "yml" => cfg!(feature = "yaml"),
            "toml" => cfg!(feature = "toml"),
            "json" => cfg!(feature = "json"),
            _ => false,
        };

        if supported {
            Ok(())
        } else {
            Err(ConfigError::Load(format!(
                "Unsupported file extension: {}. Supported: .yaml, .yml, .toml, .json",
                extension
            )))
        }
    }
}

impl ConfigSource for FileSource {
    fn load(&self) -> Result<HashMap<String, String>> {
        self.validate_extension()?;

        if !self.path.exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                self.path.display()
            )));
        }

        let config = config::Config::builder()
            .add_source(File::from(self.path.clone()).required(true))
            .build()
            .map_err(|e| ConfigError::Load(format!("Failed to load file: {}", e)))?;

        let map = config
            .try_deserialize::<HashMap<String, config::Value>>()
            .map_err(|e| ConfigError::Deserialization(format!("Failed to parse file: {}", e)))?;

        map.into_iter()
            .map(|(key, value)| -> Result<(String, String)> {
                if let ValueKind::Nil = value.kind {
                    return Ok((key.to_uppercase(), String::new()));
                }
                let value = value.into_string().map_err(|e| {
                    ConfigError::Deserialization(format!(
                        "Value of {} in {} is not a scalar: {}",
                        key,
                        self.path.display(),
                        e
                    ))
                })?;
                Ok((key.to_uppercase(), value))
            })
            .collect()
    }

    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
