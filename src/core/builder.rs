//! Builder that loads, validates, and reports the startup configuration.

use crate::core::{ConfigLoader, Defaults, Validated, validate_with};
use crate::error::{ConfigError, Result, ValidationFailure};
use crate::sources::{ConfigSource, EnvSource, FileSource};
use std::collections::HashMap;
use std::path::PathBuf;

const FILE_PRIORITY_BASE: i32 = 100;
const FILE_PRIORITY_STEP: i32 = 10;
/// Highest priority a file gets; stays below [`MapSource`](crate::sources::MapSource).
const FILE_PRIORITY_MAX: i32 = 190;

/// Entry point for building the startup configuration.
///
/// `PodwatchConfig` has no state of its own; see [`PodwatchConfig::builder`].
pub struct PodwatchConfig;

impl PodwatchConfig {
    /// Create a new builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for loading and validating the startup configuration.
///
/// Collects sources, merges them into one snapshot, validates it, and logs
/// every warning and violation through `tracing` before returning.
///
/// # Examples
///
/// ```rust
/// use podwatch_config::prelude::*;
/// use std::collections::HashMap;
///
/// # fn example() -> Result<()> {
/// let env = HashMap::from([
///     ("KUBERNETES_SERVICE_HOST".to_string(), "10.0.0.1".to_string()),
///     ("KUBERNETES_SERVICE_PORT".to_string(), "443".to_string()),
///     ("PODWATCH_CUSTOM_SERVER_URL".to_string(), "https://events".to_string()),
///     ("PODWATCH_WEB_SERVICE_URL".to_string(), "https://svc".to_string()),
///     ("EXTERNAL_KUBERNETES_PROXY_HOST".to_string(), "http://host".to_string()),
/// ]);
///
/// let validated = PodwatchConfig::builder().with_env_map(env).build()?;
/// assert!(validated.config.is_in_cluster());
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct ConfigBuilder {
    file_paths: Vec<PathBuf>,
    env: Option<EnvSource>,
    custom_sources: Vec<Box<dyn ConfigSource>>,
    defaults: Defaults,
}

impl ConfigBuilder {
    /// Create a new builder with no sources and the standard defaults.
    pub fn new() -> Self {
        Self {
            file_paths: Vec::new(),
            env: None,
            custom_sources: Vec::new(),
            defaults: Defaults::default(),
        }
    }

    /// Read the process environment (priority 300).
    pub fn with_env(mut self) -> Self {
        self.env = Some(EnvSource::new());
        self
    }

    /// Use `vars` in place of the process environment (priority 300).
    pub fn with_env_map(mut self, vars: HashMap<String, String>) -> Self {
        self.env = Some(EnvSource::from_map(vars));
        self
    }

    /// Add a flat YAML, TOML, or JSON file of variable values.
    ///
    /// Files are added in the order they are specified. Later files have
    /// higher priority, and all files rank below in-memory sources and the
    /// environment.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_paths.push(path.into());
        self
    }

    /// Add a custom configuration source.
    pub fn with_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        self.custom_sources.push(Box::new(source));
        self
    }

    /// Replace the default substitution policy.
    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Load every source, validate the merged snapshot, and log the outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No source was configured, or one fails to load
    /// - Validation fails ([`ConfigError::Validation`] carries every violation)
    pub fn build(self) -> Result<Validated> {
        let mut loader = ConfigLoader::new();

        for (index, path) in self.file_paths.iter().enumerate() {
            loader.add_source(Box::new(
                FileSource::new(path).with_priority(file_priority(index)),
            ));
        }

        for source in self.custom_sources {
            loader.add_source(source);
        }

        if let Some(env) = self.env {
            loader.add_source(Box::new(env));
        }

        let raw = loader.load()?;

        match validate_with(&raw, &self.defaults) {
            Ok(validated) => {
                for warning in &validated.warnings {
                    tracing::warn!(code = %warning.code, key = %warning.key, "{}", warning.message());
                }
                tracing::info!(
                    mode = ?validated.config.deployment_mode,
                    warnings = validated.warnings.len(),
                    "configuration validated"
                );
                Ok(validated)
            }
            Err(failure) => {
                log_failure(&failure);
                Err(ConfigError::Validation(failure))
            }
        }
    }
}

/// 100, 110, 120, ... up to 190. Files past the cap tie, and the loader's
/// stable sort keeps them in insertion order.
fn file_priority(index: usize) -> i32 {
    i32::try_from(index)
        .ok()
        .and_then(|i| i.checked_mul(FILE_PRIORITY_STEP))
        .and_then(|offset| offset.checked_add(FILE_PRIORITY_BASE))
        .map_or(FILE_PRIORITY_MAX, |p| p.min(FILE_PRIORITY_MAX))
}

fn log_failure(failure: &ValidationFailure) {
    for warning in failure.warnings() {
        tracing::warn!(code = %warning.code, key = %warning.key, "{}", warning.message());
    }
    for error in failure.errors() {
        tracing::error!(kind = ?error.kind(), key = %error.key(), "{}", error);
    }
    tracing::error!(
        violations = failure.errors().len(),
        "configuration is invalid; refusing to start"
    );
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DeploymentMode, EnvVar};
    use crate::error::ValidationErrorKind;
    use crate::sources::MapSource;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_builder_accumulates_files() {
        let builder = ConfigBuilder::new()
            .with_file("env1.yaml")
            .with_file("env2.yaml")
            .with_file("env3.yaml");

        assert_eq!(builder.file_paths.len(), 3);
    }

    #[test]
    fn test_file_priorities_stay_below_map_sources() {
        assert_eq!(file_priority(0), 100);
        assert_eq!(file_priority(1), 110);
        assert_eq!(file_priority(9), 190);
        assert_eq!(file_priority(10), 190);
        assert_eq!(file_priority(usize::MAX), 190);

        let map_priority = MapSource::new([("A", "1")]).priority();
        assert!((0..20).all(|i| file_priority(i) < map_priority));
    }

    #[test]
    fn test_builder_without_sources_fails_to_load() {
        let err = ConfigBuilder::new().build().unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn test_builder_validates_merged_snapshot() {
        let validated = PodwatchConfig::builder()
            .with_source(MapSource::new([
                ("PODWATCH_WEB_SERVICE_URL", "https://svc"),
                ("EXTERNAL_KUBERNETES_PROXY_HOST", "http://host"),
            ]))
            .with_env_map(env(&[
                ("PODWATCH_SERVICE_ACCOUNT_TOKEN", "token"),
                ("PODWATCH_PORT", "3000"),
                ("PODWATCH_CLIENT_ID", "id"),
                ("PODWATCH_CLIENT_SECRET", "secret"),
                ("HOME", "/root"),
            ]))
            .build()
            .unwrap();

        assert_eq!(validated.config.deployment_mode, DeploymentMode::External);
        assert_eq!(validated.config.listen_port, Some(3000));
    }

    #[test]
    fn test_builder_reports_validation_failure() {
        let err = PodwatchConfig::builder()
            .with_env_map(env(&[("KUBERNETES_SERVICE_HOST", "10.0.0.1")]))
            .build()
            .unwrap_err();

        let ConfigError::Validation(failure) = err else {
            panic!("expected a validation failure");
        };
        assert!(failure.contains(
            ValidationErrorKind::MissingPairedVariable,
            EnvVar::KubernetesServicePort
        ));
    }

    #[test]
    fn test_builder_custom_defaults() {
        let validated = PodwatchConfig::builder()
            .with_env_map(env(&[
                ("KUBERNETES_SERVICE_HOST", "10.0.0.1"),
                ("KUBERNETES_SERVICE_PORT", "443"),
                ("PODWATCH_CUSTOM_SERVER_URL", "https://x"),
                ("PODWATCH_WEB_SERVICE_URL", "https://svc"),
            ]))
            .with_defaults(Defaults::default().with_proxy_host_fallback())
            .build()
            .unwrap();

        assert_eq!(
            validated.config.external_kubernetes_proxy_host,
            "http://host.docker.internal"
        );
    }
}
