//! Non-fatal findings.

use crate::core::EnvVar;
use serde::Serialize;
use std::fmt;

/// Category of a [`Warning`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WarningCode {
    /// A variable only used outside the cluster was supplied in-cluster.
    #[serde(rename = "external.host")]
    ExternalHost,
    /// Web service credentials were supplied alongside a custom server.
    #[serde(rename = "custom.server")]
    CustomServer,
}

impl WarningCode {
    /// The stable code string (`external.host` or `custom.server`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExternalHost => "external.host",
            Self::CustomServer => "custom.server",
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A variable that was supplied but will be ignored in the active mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// What kind of exemption applied
    pub code: WarningCode,
    /// The ignored variable
    pub key: EnvVar,
}

impl Warning {
    /// Operator-facing explanation.
    pub fn message(&self) -> String {
        match self.code {
            WarningCode::ExternalHost => format!(
                "Environment variable {} is not required when running inside the cluster",
                self.key
            ),
            WarningCode::CustomServer => format!(
                "The use of a custom server negates the need for a {} environment variable. \
                 If you instead meant to use the Podwatch Web Service, please unset the \
                 PODWATCH_CUSTOM_SERVER_URL environment variable.",
                self.key
            ),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message())
    }
}
