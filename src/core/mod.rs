//! Core configuration types and the validator.

mod builder;
mod config;
mod defaults;
mod keys;
mod loader;
mod raw;
mod validation;
mod warning;

pub use builder::{ConfigBuilder, PodwatchConfig};
pub use config::{DeploymentMode, DispatchTarget, SharedConfig, ValidatedConfig};
pub use defaults::{
    DEFAULT_DISPATCH_IDLE_TIMEOUT_MS, DEFAULT_EXTERNAL_KUBERNETES_PROXY_HOST,
    DEFAULT_MAX_DISPATCH_QUEUE_SIZE, DEFAULT_WEBHOOK_INSTANCE_TIMEOUT_MS, Defaults,
};
pub use keys::{EnvVar, UnknownEnvVar};
pub use loader::ConfigLoader;
pub use raw::RawEnvironment;
pub use validation::{MAX_SAFE_INTEGER, Validated, validate, validate_with};
pub use warning::{Warning, WarningCode};
