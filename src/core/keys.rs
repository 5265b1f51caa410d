//! The fixed set of environment variables Podwatch reads.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// An environment variable recognised by the validator.
///
/// Variants are ordered as they are declared, which is also the order used
/// by [`EnvVar::ALL`] and by [`RawEnvironment`](crate::core::RawEnvironment)
/// iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "&'static str")]
pub enum EnvVar {
    /// `PODWATCH_SERVICE_ACCOUNT_TOKEN`
    PodwatchServiceAccountToken,
    /// `PODWATCH_PORT`
    PodwatchPort,
    /// `KUBERNETES_SERVICE_HOST`
    KubernetesServiceHost,
    /// `KUBERNETES_SERVICE_PORT`
    KubernetesServicePort,
    /// `PODWATCH_CUSTOM_SERVER_URL`
    PodwatchCustomServerUrl,
    /// `PODWATCH_CLIENT_ID`
    PodwatchClientId,
    /// `PODWATCH_CLIENT_SECRET`
    PodwatchClientSecret,
    /// `MAX_DISPATCH_QUEUE_SIZE`
    MaxDispatchQueueSize,
    /// `DISPATCH_IDLE_TIMEOUT`
    DispatchIdleTimeout,
    /// `WEBHOOK_INSTANCE_TIMEOUT`
    WebhookInstanceTimeout,
    /// `PODWATCH_WEB_SERVICE_URL`
    PodwatchWebServiceUrl,
    /// `EXTERNAL_KUBERNETES_PROXY_HOST`
    ExternalKubernetesProxyHost,
}

impl EnvVar {
    /// Every recognised variable, in declaration order.
    pub const ALL: [EnvVar; 12] = [
        Self::PodwatchServiceAccountToken,
        Self::PodwatchPort,
        Self::KubernetesServiceHost,
        Self::KubernetesServicePort,
        Self::PodwatchCustomServerUrl,
        Self::PodwatchClientId,
        Self::PodwatchClientSecret,
        Self::MaxDispatchQueueSize,
        Self::DispatchIdleTimeout,
        Self::WebhookInstanceTimeout,
        Self::PodwatchWebServiceUrl,
        Self::ExternalKubernetesProxyHost,
    ];

    /// The variable name as it appears in the environment.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PodwatchServiceAccountToken => "PODWATCH_SERVICE_ACCOUNT_TOKEN",
            Self::PodwatchPort => "PODWATCH_PORT",
            Self::KubernetesServiceHost => "KUBERNETES_SERVICE_HOST",
            Self::KubernetesServicePort => "KUBERNETES_SERVICE_PORT",
            Self::PodwatchCustomServerUrl => "PODWATCH_CUSTOM_SERVER_URL",
            Self::PodwatchClientId => "PODWATCH_CLIENT_ID",
            Self::PodwatchClientSecret => "PODWATCH_CLIENT_SECRET",
            Self::MaxDispatchQueueSize => "MAX_DISPATCH_QUEUE_SIZE",
            Self::DispatchIdleTimeout => "DISPATCH_IDLE_TIMEOUT",
            Self::WebhookInstanceTimeout => "WEBHOOK_INSTANCE_TIMEOUT",
            Self::PodwatchWebServiceUrl => "PODWATCH_WEB_SERVICE_URL",
            Self::ExternalKubernetesProxyHost => "EXTERNAL_KUBERNETES_PROXY_HOST",
        }
    }

    /// Look up a variable by its exact (case-sensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    /// What the variable controls, for operator-facing output.
    pub const fn description(self) -> &'static str {
        match self {
            Self::PodwatchServiceAccountToken => {
                "Service account token used to reach the Kubernetes API when hosted outside the cluster"
            }
            Self::PodwatchPort => "Port the service listens on when hosted outside the cluster",
            Self::KubernetesServiceHost => {
                "Kubernetes API host inside the cluster (set automatically by Kubernetes)"
            }
            Self::KubernetesServicePort => {
                "Kubernetes API port inside the cluster (set automatically by Kubernetes)"
            }
            Self::PodwatchCustomServerUrl => {
                "Custom server that receives dispatched events instead of the Podwatch Web Service"
            }
            Self::PodwatchClientId => "Client ID identifying the cluster to the Podwatch Web Service",
            Self::PodwatchClientSecret => {
                "Client secret authenticating the cluster with the Podwatch Web Service"
            }
            Self::MaxDispatchQueueSize => "Maximum number of events dispatched at once",
            Self::DispatchIdleTimeout => "Milliseconds to wait before dispatching queued events",
            Self::WebhookInstanceTimeout => {
                "Milliseconds before the dispatcher gives up on a webhook instance"
            }
            Self::PodwatchWebServiceUrl => "URL of the Podwatch Web Service",
            Self::ExternalKubernetesProxyHost => {
                "Host proxying Kubernetes API requests when hosted outside the cluster"
            }
        }
    }
}

impl fmt::Display for EnvVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<EnvVar> for &'static str {
    fn from(key: EnvVar) -> Self {
        key.name()
    }
}

/// Error returned when parsing a name outside the recognised set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown environment variable: {0}")]
pub struct UnknownEnvVar(pub String);

impl FromStr for EnvVar {
    type Err = UnknownEnvVar;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownEnvVar(s.to_string()))
    }
}
