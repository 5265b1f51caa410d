//! Error types for podwatch-config.

use crate::core::{EnvVar, Warning};
use std::fmt;

/// Result type alias for podwatch-config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to load a raw snapshot from a source.
    #[error("Failed to load configuration: {0}")]
    Load(String),

    /// A source produced values that could not be read as flat strings.
    #[error("Failed to deserialize configuration: {0}")]
    Deserialization(String),

    /// The snapshot violated one or more validation rules.
    #[error("Configuration validation failed: {0}")]
    Validation(#[from] ValidationFailure),
}

/// Why a variable was required at the point it was found missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// Required regardless of deployment mode.
    Always,
    /// Required because `KUBERNETES_SERVICE_HOST` is absent.
    OutsideCluster,
    /// Required because `PODWATCH_CUSTOM_SERVER_URL` is absent.
    WebService,
}

/// Discriminant of a [`ValidationError`], for matching without payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// See [`ValidationError::MissingRequiredVariable`].
    MissingRequiredVariable,
    /// See [`ValidationError::MissingPairedVariable`].
    MissingPairedVariable,
    /// See [`ValidationError::InvalidFormat`].
    InvalidFormat,
}

/// A single violated rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A variable with no applicable exemption is absent.
    #[error("{}", missing_message(.key, .requirement))]
    MissingRequiredVariable {
        /// The absent variable
        key: EnvVar,
        /// The condition that made it required
        requirement: Requirement,
    },

    /// One half of a linked pair is present without the other.
    #[error("Environment variable {key} must be set because {paired_with} is set")]
    MissingPairedVariable {
        /// The absent half of the pair
        key: EnvVar,
        /// The half that was supplied
        paired_with: EnvVar,
    },

    /// A value is present but does not satisfy its type constraint.
    #[error("Environment variable {key} has invalid value {value:?}: expected {expected}")]
    InvalidFormat {
        /// The offending variable
        key: EnvVar,
        /// The raw value as supplied
        value: String,
        /// What the value should have looked like
        expected: &'static str,
    },
}

fn missing_message(key: &EnvVar, requirement: &Requirement) -> String {
    match requirement {
        Requirement::Always => format!("Environment variable {key} is required."),
        Requirement::OutsideCluster => {
            format!("Environment variable {key} is required when running outside the cluster.")
        }
        Requirement::WebService => format!("Please set the {key} environment variable."),
    }
}

impl ValidationError {
    /// The kind of rule that was violated.
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::MissingRequiredVariable { .. } => ValidationErrorKind::MissingRequiredVariable,
            Self::MissingPairedVariable { .. } => ValidationErrorKind::MissingPairedVariable,
            Self::InvalidFormat { .. } => ValidationErrorKind::InvalidFormat,
        }
    }

    /// The variable the violation is reported against.
    pub fn key(&self) -> EnvVar {
        match self {
            Self::MissingRequiredVariable { key, .. }
            | Self::MissingPairedVariable { key, .. }
            | Self::InvalidFormat { key, .. } => *key,
        }
    }
}

/// Every violated rule found in one validation pass.
///
/// Warnings gathered during the same pass are kept alongside so an operator
/// sees the whole picture in one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    errors: Vec<ValidationError>,
    warnings: Vec<Warning>,
}

impl ValidationFailure {
    pub(crate) fn new(errors: Vec<ValidationError>, warnings: Vec<Warning>) -> Self {
        Self { errors, warnings }
    }

    /// The violations, in rule evaluation order. Never empty.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Non-fatal warnings raised by the same pass.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Kinds of all violations, in order.
    pub fn kinds(&self) -> Vec<ValidationErrorKind> {
        self.errors.iter().map(ValidationError::kind).collect()
    }

    /// Whether a violation of `kind` was reported against `key`.
    pub fn contains(&self, kind: ValidationErrorKind, key: EnvVar) -> bool {
        self.errors.iter().any(|e| e.kind() == kind && e.key() == key)
    }

    /// Variables reported with a violation of `kind`, in order.
    pub fn keys_of(&self, kind: ValidationErrorKind) -> Vec<EnvVar> {
        self.errors
            .iter()
            .filter(|e| e.kind() == kind)
            .map(ValidationError::key)
            .collect()
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [only] = self.errors.as_slice() {
            return write!(f, "{}", only);
        }
        writeln!(f, "Multiple validation errors:")?;
        for (i, err) in self.errors.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}
