//! The typed, validated configuration record.

use serde::Serialize;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

/// Where the process runs relative to the Kubernetes cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeploymentMode {
    /// Running inside the cluster; the API endpoint comes from
    /// `KUBERNETES_SERVICE_HOST` / `KUBERNETES_SERVICE_PORT`.
    InCluster,
    /// Running outside the cluster with an explicit service account token.
    External,
}

/// Where dispatched events are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchTarget<'a> {
    /// A custom server configured with `PODWATCH_CUSTOM_SERVER_URL`.
    CustomServer {
        /// Custom server URL
        url: &'a str,
    },
    /// The hosted Podwatch Web Service.
    WebService {
        /// Web service URL
        url: &'a str,
        /// Client ID identifying the cluster
        client_id: &'a str,
        /// Client secret authenticating the cluster
        client_secret: &'a str,
    },
}

/// Runtime parameters that passed validation.
///
/// Built once at startup and never mutated; share it with [`SharedConfig`].
/// Fields that only apply to one mode are `None` in the other, even when the
/// operator supplied them.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedConfig {
    /// Derived from the presence of `KUBERNETES_SERVICE_HOST`
    pub deployment_mode: DeploymentMode,
    /// `PODWATCH_SERVICE_ACCOUNT_TOKEN`; external mode only
    #[serde(skip_serializing)]
    pub service_account_token: Option<String>,
    /// `PODWATCH_PORT`; external mode only
    pub listen_port: Option<u16>,
    /// `KUBERNETES_SERVICE_HOST`; in-cluster mode only
    pub kubernetes_host: Option<String>,
    /// `KUBERNETES_SERVICE_PORT`; in-cluster mode only
    pub kubernetes_port: Option<String>,
    /// `PODWATCH_CUSTOM_SERVER_URL`
    #[serde(rename = "customServerURL")]
    pub custom_server_url: Option<String>,
    /// `PODWATCH_CLIENT_ID`; only without a custom server
    #[serde(rename = "clientID")]
    pub client_id: Option<String>,
    /// `PODWATCH_CLIENT_SECRET`; only without a custom server
    #[serde(skip_serializing)]
    pub client_secret: Option<String>,
    /// `MAX_DISPATCH_QUEUE_SIZE`
    pub max_dispatch_queue_size: i64,
    /// `DISPATCH_IDLE_TIMEOUT`
    pub dispatch_idle_timeout_ms: i64,
    /// `WEBHOOK_INSTANCE_TIMEOUT`
    pub webhook_instance_timeout_ms: i64,
    /// `PODWATCH_WEB_SERVICE_URL`
    #[serde(rename = "podwatchWebServiceURL")]
    pub podwatch_web_service_url: String,
    /// `EXTERNAL_KUBERNETES_PROXY_HOST`
    pub external_kubernetes_proxy_host: String,
}

impl ValidatedConfig {
    /// Whether the process runs inside the cluster.
    pub fn is_in_cluster(&self) -> bool {
        self.deployment_mode == DeploymentMode::InCluster
    }

    /// Idle time before queued events are dispatched; `None` if negative.
    pub fn dispatch_idle_timeout(&self) -> Option<Duration> {
        millis(self.dispatch_idle_timeout_ms)
    }

    /// Time before a webhook instance is abandoned; `None` if negative.
    pub fn webhook_instance_timeout(&self) -> Option<Duration> {
        millis(self.webhook_instance_timeout_ms)
    }

    /// Where events are dispatched.
    ///
    /// A custom server takes precedence; otherwise the web service is used
    /// with the client credentials. Returns `None` for a record without a
    /// custom server or a full set of credentials, which validation never
    /// produces.
    pub fn dispatch_target(&self) -> Option<DispatchTarget<'_>> {
        match (&self.custom_server_url, &self.client_id, &self.client_secret) {
            (Some(url), _, _) => Some(DispatchTarget::CustomServer { url }),
            (None, Some(client_id), Some(client_secret)) => Some(DispatchTarget::WebService {
                url: &self.podwatch_web_service_url,
                client_id,
                client_secret,
            }),
            (None, _, _) => None,
        }
    }

    /// The in-cluster Kubernetes API endpoint, `https://host:port`.
    pub fn kubernetes_api_endpoint(&self) -> Option<String> {
        match (&self.kubernetes_host, &self.kubernetes_port) {
            (Some(host), Some(port)) if host.contains(':') => {
                Some(format!("https://[{}]:{}", host, port))
            }
            (Some(host), Some(port)) => Some(format!("https://{}:{}", host, port)),
            _ => None,
        }
    }
}

fn millis(ms: i64) -> Option<Duration> {
    u64::try_from(ms).ok().map(Duration::from_millis)
}

fn redact(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "<redacted>")
}

impl fmt::Debug for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedConfig")
            .field("deployment_mode", &self.deployment_mode)
            .field("service_account_token", &redact(&self.service_account_token))
            .field("listen_port", &self.listen_port)
            .field("kubernetes_host", &self.kubernetes_host)
            .field("kubernetes_port", &self.kubernetes_port)
            .field("custom_server_url", &self.custom_server_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("max_dispatch_queue_size", &self.max_dispatch_queue_size)
            .field("dispatch_idle_timeout_ms", &self.dispatch_idle_timeout_ms)
            .field("webhook_instance_timeout_ms", &self.webhook_instance_timeout_ms)
            .field("podwatch_web_service_url", &self.podwatch_web_service_url)
            .field(
                "external_kubernetes_proxy_host",
                &self.external_kubernetes_proxy_host,
            )
            .finish()
    }
}

/// Read-only handle to the validated configuration.
///
/// Cloning is a reference-count bump; every downstream component holds its
/// own clone for the life of the process.
///
/// # Examples
///
/// ```rust
/// use podwatch_config::core::{EnvVar, RawEnvironment, SharedConfig, validate};
///
/// let raw = RawEnvironment::new()
///     .with(EnvVar::KubernetesServiceHost, "10.0.0.1")
///     .with(EnvVar::KubernetesServicePort, "443")
///     .with(EnvVar::PodwatchCustomServerUrl, "https://events.example.com")
///     .with(EnvVar::PodwatchWebServiceUrl, "https://svc.example.com")
///     .with(EnvVar::ExternalKubernetesProxyHost, "http://host");
///
/// let shared = SharedConfig::new(validate(&raw).unwrap().config);
/// let for_dispatcher = shared.clone();
/// assert_eq!(for_dispatcher.max_dispatch_queue_size, 20);
/// ```
#[derive(Debug, Clone)]
pub struct SharedConfig {
    inner: Arc<ValidatedConfig>,
}

impl SharedConfig {
    /// Wrap a validated record for sharing.
    pub fn new(config: ValidatedConfig) -> Self {
        Self {
            inner: Arc::new(config),
        }
    }

    /// Reference-counted handle to the record.
    pub fn get(&self) -> Arc<ValidatedConfig> {
        Arc::clone(&self.inner)
    }
}

impl Deref for SharedConfig {
    type Target = ValidatedConfig;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ValidatedConfig> for SharedConfig {
    fn from(config: ValidatedConfig) -> Self {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn external() -> ValidatedConfig {
        ValidatedConfig {
            deployment_mode: DeploymentMode::External,
            service_account_token: Some("token".to_string()),
            listen_port: Some(8080),
            kubernetes_host: None,
            kubernetes_port: None,
            custom_server_url: None,
            client_id: Some("client".to_string()),
            client_secret: Some("secret".to_string()),
            max_dispatch_queue_size: 20,
            dispatch_idle_timeout_ms: 1000,
            webhook_instance_timeout_ms: -1,
            podwatch_web_service_url: "https://svc".to_string(),
            external_kubernetes_proxy_host: "http://host".to_string(),
        }
    }

    #[test]
    fn test_durations() {
        let config = external();
        assert_eq!(
            config.dispatch_idle_timeout(),
            Some(Duration::from_millis(1000))
        );
        assert_eq!(config.webhook_instance_timeout(), None);
    }

    #[test]
    fn test_dispatch_target_web_service() {
        let config = external();
        assert_eq!(
            config.dispatch_target(),
            Some(DispatchTarget::WebService {
                url: "https://svc",
                client_id: "client",
                client_secret: "secret",
            })
        );
    }

    #[test]
    fn test_dispatch_target_without_credentials() {
        let mut config = external();
        config.client_secret = None;
        assert_eq!(config.dispatch_target(), None);

        config.client_id = None;
        assert_eq!(config.dispatch_target(), None);
    }

    #[test]
    fn test_dispatch_target_custom_server() {
        let mut config = external();
        config.custom_server_url = Some("https://custom".to_string());
        assert_eq!(
            config.dispatch_target(),
            Some(DispatchTarget::CustomServer {
                url: "https://custom"
            })
        );
    }

    #[test]
    fn test_kubernetes_api_endpoint() {
        let mut config = external();
        assert_eq!(config.kubernetes_api_endpoint(), None);

        config.kubernetes_host = Some("10.0.0.1".to_string());
        config.kubernetes_port = Some("443".to_string());
        assert_eq!(
            config.kubernetes_api_endpoint().as_deref(),
            Some("https://10.0.0.1:443")
        );

        config.kubernetes_host = Some("fd00::1".to_string());
        assert_eq!(
            config.kubernetes_api_endpoint().as_deref(),
            Some("https://[fd00::1]:443")
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", external());
        assert!(!rendered.contains("\"token\""));
        assert!(!rendered.contains("\"secret\""));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("\"client\""));
    }

    #[test]
    fn test_serialize_skips_secrets() {
        let json = serde_json::to_value(external()).unwrap();
        assert_eq!(json["deploymentMode"], "External");
        assert_eq!(json["listenPort"], 8080);
        assert_eq!(json["clientID"], "client");
        assert!(json.get("clientSecret").is_none());
        assert!(json.get("serviceAccountToken").is_none());
    }

    #[test]
    fn test_shared_config_clones_share_record() {
        let shared = SharedConfig::new(external());
        let other = shared.clone();
        assert!(Arc::ptr_eq(&shared.get(), &other.get()));
        assert_eq!(other.listen_port, Some(8080));
    }
}
