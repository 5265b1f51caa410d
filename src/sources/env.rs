//! Process environment configuration source.

use super::ConfigSource;
use crate::core::EnvVar;
use crate::error::{ConfigError, Result};
use config::{Environment, Source};
use std::collections::HashMap;
use std::ffi::OsString;

/// Snapshot of environment variables.
///
/// By default this reads the process environment once per [`load`] call.
/// [`EnvSource::from_map`] substitutes a fixed map, which keeps tests and
/// embedders independent of the real environment.
///
/// Only recognised variables are taken from the process environment, so
/// unrelated variables with non-UTF-8 names or values are ignored.
///
/// The `config` crate lower-cases names while collecting; this source
/// upper-cases them again so they line up with the variable names.
///
/// [`load`]: ConfigSource::load
///
/// # Examples
///
/// ```rust
/// use podwatch_config::sources::{ConfigSource, EnvSource};
/// use std::collections::HashMap;
///
/// let source = EnvSource::from_map(HashMap::from([
///     ("PODWATCH_PORT".to_string(), "8080".to_string()),
/// ]));
/// let values = source.load().unwrap();
/// assert_eq!(values.get("PODWATCH_PORT").map(String::as_str), Some("8080"));
/// ```
pub struct EnvSource {
    source: Option<HashMap<String, String>>,
    priority: i32,
}

impl EnvSource {
    /// Create a source that reads the process environment.
    pub fn new() -> Self {
        Self {
            source: None,
            priority: 300, // Env vars have highest priority by default
        }
    }

    /// Create a source that reads `vars` instead of the process environment.
    pub fn from_map(vars: HashMap<String, String>) -> Self {
        Self {
            source: Some(vars),
            priority: 300,
        }
    }

    /// Set the priority for this source.
    ///
    /// Higher priority sources override lower priority ones.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for EnvSource {
    fn load(&self) -> Result<HashMap<String, String>> {
        let vars = match &self.source {
            Some(vars) => vars.clone(),
            None => recognised_vars(std::env::vars_os())?,
        };

        let collected = Environment::default()
            .source(Some(vars))
            .collect()
            .map_err(|e| {
                ConfigError::Load(format!("Failed to read environment variables: {}", e))
            })?;

        collected
            .into_iter()
            .map(|(key, value)| -> Result<(String, String)> {
                let value = value.into_string().map_err(|e| {
                    ConfigError::Deserialization(format!(
                        "Environment variable {} is not a string: {}",
                        key, e
                    ))
                })?;
                Ok((key.to_uppercase(), value))
            })
            .collect()
    }

    fn name(&self) -> String {
        match self.source {
            Some(_) => "env:map".to_string(),
            None => "env:process".to_string(),
        }
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// Keep the recognised variables from an OS environment listing.
///
/// Names that are not UTF-8 cannot be recognised and are skipped; a
/// recognised variable whose value is not UTF-8 is an error.
fn recognised_vars(
    vars: impl IntoIterator<Item = (OsString, OsString)>,
) -> Result<HashMap<String, String>> {
    let mut recognised = HashMap::new();
    for (name, value) in vars {
        let Some(name) = name.to_str() else {
            continue;
        };
        if EnvVar::from_name(&name.to_uppercase()).is_none() {
            continue;
        }
        let value = value.into_string().map_err(|_| {
            ConfigError::Load(format!(
                "Environment variable {} is not valid UTF-8",
                name
            ))
        })?;
        recognised.insert(name.to_string(), value);
    }
    Ok(recognised)
}
