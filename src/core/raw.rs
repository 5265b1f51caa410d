//! Raw, unvalidated environment snapshot.

use crate::core::EnvVar;
use std::collections::BTreeMap;

/// A one-shot snapshot of the recognised environment variables.
///
/// Absence and the empty string are treated identically: setting a key to
/// `""` removes it. The validator only ever reads a snapshot, it never reads
/// the process environment itself.
///
/// # Examples
///
/// ```rust
/// use podwatch_config::core::{EnvVar, RawEnvironment};
///
/// let raw = RawEnvironment::new()
///     .with(EnvVar::KubernetesServiceHost, "10.0.0.1")
///     .with(EnvVar::KubernetesServicePort, "");
///
/// assert_eq!(raw.get(EnvVar::KubernetesServiceHost), Some("10.0.0.1"));
/// assert!(!raw.is_present(EnvVar::KubernetesServicePort));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEnvironment {
    values: BTreeMap<EnvVar, String>,
}

impl RawEnvironment {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from `(name, value)` pairs.
    ///
    /// Names outside the recognised set are not an error; they are returned
    /// alongside the snapshot so the caller can report them if it wants to.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use podwatch_config::core::{EnvVar, RawEnvironment};
    ///
    /// let (raw, ignored) = RawEnvironment::from_pairs([
    ///     ("PODWATCH_PORT", "8080"),
    ///     ("HOME", "/root"),
    /// ]);
    ///
    /// assert_eq!(raw.get(EnvVar::PodwatchPort), Some("8080"));
    /// assert_eq!(ignored, vec!["HOME".to_string()]);
    /// ```
    pub fn from_pairs<I, K, V>(pairs: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = Self::new();
        let mut ignored = Vec::new();
        for (name, value) in pairs {
            match EnvVar::from_name(name.as_ref()) {
                Some(key) => {
                    raw.set(key, value);
                }
                None => ignored.push(name.as_ref().to_string()),
            }
        }
        (raw, ignored)
    }

    /// Set `key` and return the snapshot, builder style.
    pub fn with(mut self, key: EnvVar, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set `key`, returning the previous value. An empty value unsets it.
    pub fn set(&mut self, key: EnvVar, value: impl Into<String>) -> Option<String> {
        let value = value.into();
        if value.is_empty() {
            self.values.remove(&key)
        } else {
            self.values.insert(key, value)
        }
    }

    /// Unset `key`, returning the previous value.
    pub fn remove(&mut self, key: EnvVar) -> Option<String> {
        self.values.remove(&key)
    }

    /// The value of `key`, if set.
    pub fn get(&self, key: EnvVar) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// Whether `key` is set to a non-empty value.
    pub fn is_present(&self, key: EnvVar) -> bool {
        self.values.contains_key(&key)
    }

    /// Number of set variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no variable is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate set variables in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (EnvVar, &str)> {
        self.values.iter().map(|(key, value)| (*key, value.as_str()))
    }
}

impl<V: Into<String>> FromIterator<(EnvVar, V)> for RawEnvironment {
    fn from_iter<I: IntoIterator<Item = (EnvVar, V)>>(iter: I) -> Self {
        let mut raw = Self::new();
        for (key, value) in iter {
            raw.set(key, value);
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_is_unset() {
        let mut raw = RawEnvironment::new().with(EnvVar::PodwatchClientId, "id");
        assert!(raw.is_present(EnvVar::PodwatchClientId));

        let previous = raw.set(EnvVar::PodwatchClientId, "");
        assert_eq!(previous, Some("id".to_string()));
        assert!(!raw.is_present(EnvVar::PodwatchClientId));
        assert!(raw.is_empty());
    }

    #[test]
    fn test_from_pairs_ignores_unknown_names() {
        let (raw, ignored) = RawEnvironment::from_pairs(vec![
            ("KUBERNETES_SERVICE_HOST", "10.0.0.1"),
            ("kubernetes_service_port", "443"),
            ("PATH", "/usr/bin"),
        ]);

        assert_eq!(raw.len(), 1);
        assert_eq!(raw.get(EnvVar::KubernetesServiceHost), Some("10.0.0.1"));
        assert_eq!(ignored, vec!["kubernetes_service_port", "PATH"]);
    }

    #[test]
    fn test_iter_follows_declaration_order() {
        let raw: RawEnvironment = [
            (EnvVar::ExternalKubernetesProxyHost, "http://host"),
            (EnvVar::PodwatchServiceAccountToken, "token"),
            (EnvVar::MaxDispatchQueueSize, "5"),
        ]
        .into_iter()
        .collect();

        let keys: Vec<_> = raw.iter().map(|(key, _)| key).collect();
        assert_eq!(
            keys,
            vec![
                EnvVar::PodwatchServiceAccountToken,
                EnvVar::MaxDispatchQueueSize,
                EnvVar::ExternalKubernetesProxyHost,
            ]
        );
    }

    #[test]
    fn test_remove() {
        let mut raw = RawEnvironment::new().with(EnvVar::PodwatchPort, "80");
        assert_eq!(raw.remove(EnvVar::PodwatchPort), Some("80".to_string()));
        assert_eq!(raw.remove(EnvVar::PodwatchPort), None);
    }
}
