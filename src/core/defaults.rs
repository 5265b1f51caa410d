//! Default substitution applied before validation.

use crate::core::{EnvVar, RawEnvironment};

/// Default for `MAX_DISPATCH_QUEUE_SIZE`.
pub const DEFAULT_MAX_DISPATCH_QUEUE_SIZE: i64 = 20;

/// Default for `DISPATCH_IDLE_TIMEOUT`, in milliseconds.
pub const DEFAULT_DISPATCH_IDLE_TIMEOUT_MS: i64 = 1000;

/// Default for `WEBHOOK_INSTANCE_TIMEOUT`, in milliseconds.
pub const DEFAULT_WEBHOOK_INSTANCE_TIMEOUT_MS: i64 = 10000;

/// Documented fallback for `EXTERNAL_KUBERNETES_PROXY_HOST`.
///
/// Only substituted when enabled with [`Defaults::with_proxy_host_fallback`].
pub const DEFAULT_EXTERNAL_KUBERNETES_PROXY_HOST: &str = "http://host.docker.internal";

/// Values substituted for absent variables before the rules run.
///
/// Substitution never overwrites a supplied value, and the substituted
/// snapshot goes through exactly the same rules as operator input.
///
/// # Examples
///
/// ```rust
/// use podwatch_config::core::{Defaults, EnvVar, RawEnvironment};
///
/// let raw = RawEnvironment::new().with(EnvVar::DispatchIdleTimeout, "250");
/// let filled = Defaults::default().apply(&raw);
///
/// assert_eq!(filled.get(EnvVar::DispatchIdleTimeout), Some("250"));
/// assert_eq!(filled.get(EnvVar::MaxDispatchQueueSize), Some("20"));
/// assert_eq!(filled.get(EnvVar::ExternalKubernetesProxyHost), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    /// Substituted for `MAX_DISPATCH_QUEUE_SIZE`
    pub max_dispatch_queue_size: Option<i64>,
    /// Substituted for `DISPATCH_IDLE_TIMEOUT`
    pub dispatch_idle_timeout_ms: Option<i64>,
    /// Substituted for `WEBHOOK_INSTANCE_TIMEOUT`
    pub webhook_instance_timeout_ms: Option<i64>,
    /// Substituted for `EXTERNAL_KUBERNETES_PROXY_HOST`
    pub external_kubernetes_proxy_host: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            max_dispatch_queue_size: Some(DEFAULT_MAX_DISPATCH_QUEUE_SIZE),
            dispatch_idle_timeout_ms: Some(DEFAULT_DISPATCH_IDLE_TIMEOUT_MS),
            webhook_instance_timeout_ms: Some(DEFAULT_WEBHOOK_INSTANCE_TIMEOUT_MS),
            external_kubernetes_proxy_host: None,
        }
    }
}

impl Defaults {
    /// A policy that substitutes nothing; every required variable must be supplied.
    pub fn none() -> Self {
        Self {
            max_dispatch_queue_size: None,
            dispatch_idle_timeout_ms: None,
            webhook_instance_timeout_ms: None,
            external_kubernetes_proxy_host: None,
        }
    }

    /// Also substitute [`DEFAULT_EXTERNAL_KUBERNETES_PROXY_HOST`].
    pub fn with_proxy_host_fallback(mut self) -> Self {
        self.external_kubernetes_proxy_host =
            Some(DEFAULT_EXTERNAL_KUBERNETES_PROXY_HOST.to_string());
        self
    }

    /// Return a copy of `raw` with every absent defaulted variable filled in.
    pub fn apply(&self, raw: &RawEnvironment) -> RawEnvironment {
        let mut filled = raw.clone();
        for (key, value) in self.entries() {
            match value {
                Some(value) if !filled.is_present(key) => {
                    filled.set(key, value);
                }
                _ => {}
            }
        }
        filled
    }

    fn entries(&self) -> [(EnvVar, Option<String>); 4] {
        [
            (
                EnvVar::MaxDispatchQueueSize,
                self.max_dispatch_queue_size.map(|v| v.to_string()),
            ),
            (
                EnvVar::DispatchIdleTimeout,
                self.dispatch_idle_timeout_ms.map(|v| v.to_string()),
            ),
            (
                EnvVar::WebhookInstanceTimeout,
                self.webhook_instance_timeout_ms.map(|v| v.to_string()),
            ),
            (
                EnvVar::ExternalKubernetesProxyHost,
                self.external_kubernetes_proxy_host.clone(),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fills_integer_tunables_only() {
        let filled = Defaults::default().apply(&RawEnvironment::new());
        assert_eq!(filled.get(EnvVar::MaxDispatchQueueSize), Some("20"));
        assert_eq!(filled.get(EnvVar::DispatchIdleTimeout), Some("1000"));
        assert_eq!(filled.get(EnvVar::WebhookInstanceTimeout), Some("10000"));
        assert!(!filled.is_present(EnvVar::ExternalKubernetesProxyHost));
        assert_eq!(filled.len(), 3);
    }

    #[test]
    fn test_supplied_values_win() {
        let raw = RawEnvironment::new()
            .with(EnvVar::MaxDispatchQueueSize, "abc")
            .with(EnvVar::ExternalKubernetesProxyHost, "http://proxy");
        let filled = Defaults::default().with_proxy_host_fallback().apply(&raw);
        assert_eq!(filled.get(EnvVar::MaxDispatchQueueSize), Some("abc"));
        assert_eq!(
            filled.get(EnvVar::ExternalKubernetesProxyHost),
            Some("http://proxy")
        );
    }

    #[test]
    fn test_proxy_host_fallback() {
        let filled = Defaults::default()
            .with_proxy_host_fallback()
            .apply(&RawEnvironment::new());
        assert_eq!(
            filled.get(EnvVar::ExternalKubernetesProxyHost),
            Some(DEFAULT_EXTERNAL_KUBERNETES_PROXY_HOST)
        );
    }

    #[test]
    fn test_none_substitutes_nothing() {
        let filled = Defaults::none().apply(&RawEnvironment::new());
        assert!(filled.is_empty());
    }
}
