//! # podwatch-config
//!
//! Startup validation of Podwatch's environment-derived runtime configuration.
//!
//! ## Overview
//!
//! Podwatch runs either inside a Kubernetes cluster (the platform injects
//! `KUBERNETES_SERVICE_HOST` / `KUBERNETES_SERVICE_PORT`) or outside it with
//! an explicit service account token, and dispatches events either to the
//! hosted web service or to a custom server. This crate decides, before
//! anything else starts, whether a snapshot of the environment describes a
//! coherent setup for one of those modes, and turns it into a typed,
//! immutable [`ValidatedConfig`](core::ValidatedConfig).
//!
//! - Every rule runs against the same snapshot; all violations are reported
//!   together in one [`ValidationFailure`](error::ValidationFailure)
//! - Variables that the active mode ignores produce warnings, not errors
//! - Integer tunables get defaults before validation and are range-checked
//!
//! ## Quick Start
//!
//! ```rust
//! use podwatch_config::core::{EnvVar, RawEnvironment, validate};
//!
//! let (raw, _ignored) = RawEnvironment::from_pairs([
//!     ("PODWATCH_SERVICE_ACCOUNT_TOKEN", "token"),
//!     ("PODWATCH_PORT", "3000"),
//!     ("PODWATCH_CLIENT_ID", "cluster-a"),
//!     ("PODWATCH_CLIENT_SECRET", "s3cret"),
//!     ("PODWATCH_WEB_SERVICE_URL", "https://svc.example.com"),
//!     ("EXTERNAL_KUBERNETES_PROXY_HOST", "http://host.docker.internal"),
//! ]);
//!
//! match validate(&raw) {
//!     Ok(validated) => println!("listening on {:?}", validated.config.listen_port),
//!     Err(failure) => {
//!         eprintln!("{failure}");
//!         std::process::exit(1);
//!     }
//! }
//! ```
//!
//! Loading from the process environment and optional files goes through
//! [`PodwatchConfig::builder`](core::PodwatchConfig::builder), which also logs
//! warnings and violations with `tracing`.
//!
//! ## Feature Flags
//!
//! `yaml`, `toml` and `json` (all on by default) select the file formats
//! accepted by [`FileSource`](sources::FileSource).

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod sources;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{
        Defaults, DeploymentMode, EnvVar, PodwatchConfig, RawEnvironment, SharedConfig,
        Validated, ValidatedConfig, Warning, WarningCode, validate, validate_with,
    };
    pub use crate::error::{
        ConfigError, Requirement, Result, ValidationError, ValidationErrorKind, ValidationFailure,
    };
}
