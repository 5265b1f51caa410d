//! Field-level and cross-field rules over a raw snapshot.
//!
//! Every rule reads the same immutable snapshot and contributes zero or more
//! errors and warnings. Nothing short-circuits: the caller gets the full list
//! of problems from one pass.

use crate::core::{
    Defaults, DeploymentMode, EnvVar, RawEnvironment, ValidatedConfig, Warning, WarningCode,
};
use crate::error::{Requirement, ValidationError, ValidationFailure};

/// Largest magnitude accepted for integer variables (2^53 - 1).
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

const INTEGER_EXPECTED: &str = "an integer matching -?[0-9]+ within ±9007199254740991";
const PORT_EXPECTED: &str = "a port number between 0 and 65535";

/// A validated configuration together with its non-fatal warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    /// The typed record
    pub config: ValidatedConfig,
    /// Supplied variables that are ignored in the active mode
    pub warnings: Vec<Warning>,
}

/// One predicate-guarded rule.
#[derive(Debug, Clone, Copy)]
enum Rule {
    /// The key must be present.
    Required(EnvVar),
    /// If present, the key must be a bounded integer.
    Integer(EnvVar),
    /// If `unless` is absent and the key is present, it must be a port number.
    ListenPort { key: EnvVar, unless: EnvVar },
    /// Both keys present or both absent.
    Paired(EnvVar, EnvVar),
    /// If `governor` is present, each of `keys` is optional and supplying it
    /// raises `exemption`; otherwise each is required.
    Conditional {
        governor: EnvVar,
        keys: [EnvVar; 2],
        exemption: WarningCode,
        otherwise: Requirement,
    },
}

const RULES: &[Rule] = &[
    Rule::Integer(EnvVar::MaxDispatchQueueSize),
    Rule::Required(EnvVar::MaxDispatchQueueSize),
    Rule::Integer(EnvVar::DispatchIdleTimeout),
    Rule::Required(EnvVar::DispatchIdleTimeout),
    Rule::Integer(EnvVar::WebhookInstanceTimeout),
    Rule::Required(EnvVar::WebhookInstanceTimeout),
    Rule::Required(EnvVar::PodwatchWebServiceUrl),
    Rule::Required(EnvVar::ExternalKubernetesProxyHost),
    Rule::ListenPort {
        key: EnvVar::PodwatchPort,
        unless: EnvVar::KubernetesServiceHost,
    },
    Rule::Paired(EnvVar::KubernetesServiceHost, EnvVar::KubernetesServicePort),
    Rule::Conditional {
        governor: EnvVar::KubernetesServiceHost,
        keys: [EnvVar::PodwatchServiceAccountToken, EnvVar::PodwatchPort],
        exemption: WarningCode::ExternalHost,
        otherwise: Requirement::OutsideCluster,
    },
    Rule::Paired(EnvVar::PodwatchServiceAccountToken, EnvVar::PodwatchPort),
    Rule::Conditional {
        governor: EnvVar::PodwatchCustomServerUrl,
        keys: [EnvVar::PodwatchClientId, EnvVar::PodwatchClientSecret],
        exemption: WarningCode::CustomServer,
        otherwise: Requirement::WebService,
    },
    Rule::Paired(EnvVar::PodwatchClientId, EnvVar::PodwatchClientSecret),
];

#[derive(Default)]
struct Findings {
    errors: Vec<ValidationError>,
    warnings: Vec<Warning>,
}

impl Rule {
    fn evaluate(self, raw: &RawEnvironment, findings: &mut Findings) {
        match self {
            Rule::Required(key) => {
                if !raw.is_present(key) {
                    findings.errors.push(ValidationError::MissingRequiredVariable {
                        key,
                        requirement: Requirement::Always,
                    });
                }
            }
            Rule::Integer(key) => {
                if let Some(Err(err)) = raw.get(key).map(|value| parse_integer(key, value)) {
                    findings.errors.push(err);
                }
            }
            Rule::ListenPort { key, unless } => {
                if raw.is_present(unless) {
                    return;
                }
                if let Some(Err(err)) = raw.get(key).map(|value| parse_port(key, value)) {
                    findings.errors.push(err);
                }
            }
            Rule::Paired(a, b) => match (raw.is_present(a), raw.is_present(b)) {
                (true, false) => findings.errors.push(ValidationError::MissingPairedVariable {
                    key: b,
                    paired_with: a,
                }),
                (false, true) => findings.errors.push(ValidationError::MissingPairedVariable {
                    key: a,
                    paired_with: b,
                }),
                _ => {}
            },
            Rule::Conditional {
                governor,
                keys,
                exemption,
                otherwise,
            } => {
                let exempt = raw.is_present(governor);
                for key in keys {
                    match (exempt, raw.is_present(key)) {
                        (true, true) => findings.warnings.push(Warning {
                            code: exemption,
                            key,
                        }),
                        (false, false) => {
                            findings.errors.push(ValidationError::MissingRequiredVariable {
                                key,
                                requirement: otherwise,
                            })
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}

/// Check that `value` matches `-?[0-9]+` and fits the safe-integer range.
fn parse_integer(key: EnvVar, value: &str) -> Result<i64, ValidationError> {
    let invalid = || ValidationError::InvalidFormat {
        key,
        value: value.to_string(),
        expected: INTEGER_EXPECTED,
    };

    let digits = value.strip_prefix('-').unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    value
        .parse::<i64>()
        .ok()
        .filter(|n| n.unsigned_abs() <= MAX_SAFE_INTEGER.unsigned_abs())
        .ok_or_else(invalid)
}

fn parse_port(key: EnvVar, value: &str) -> Result<u16, ValidationError> {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(port) = value.parse::<u16>() {
            return Ok(port);
        }
    }
    Err(ValidationError::InvalidFormat {
        key,
        value: value.to_string(),
        expected: PORT_EXPECTED,
    })
}

fn required(raw: &RawEnvironment, key: EnvVar) -> Result<String, ValidationError> {
    raw.get(key)
        .map(str::to_string)
        .ok_or(ValidationError::MissingRequiredVariable {
            key,
            requirement: Requirement::Always,
        })
}

fn optional(raw: &RawEnvironment, key: EnvVar) -> Option<String> {
    raw.get(key).map(str::to_string)
}

fn integer(raw: &RawEnvironment, key: EnvVar) -> Result<i64, ValidationError> {
    let value = required(raw, key)?;
    parse_integer(key, &value)
}

/// Assemble the typed record from a snapshot that passed every rule.
fn build(raw: &RawEnvironment) -> Result<ValidatedConfig, ValidationError> {
    let in_cluster = raw.is_present(EnvVar::KubernetesServiceHost);
    let custom_server_url = optional(raw, EnvVar::PodwatchCustomServerUrl);

    let (deployment_mode, service_account_token, listen_port) = if in_cluster {
        (DeploymentMode::InCluster, None, None)
    } else {
        let port = required(raw, EnvVar::PodwatchPort)?;
        (
            DeploymentMode::External,
            Some(required(raw, EnvVar::PodwatchServiceAccountToken)?),
            Some(parse_port(EnvVar::PodwatchPort, &port)?),
        )
    };

    let (client_id, client_secret) = if custom_server_url.is_some() {
        (None, None)
    } else {
        (
            Some(required(raw, EnvVar::PodwatchClientId)?),
            Some(required(raw, EnvVar::PodwatchClientSecret)?),
        )
    };

    Ok(ValidatedConfig {
        deployment_mode,
        service_account_token,
        listen_port,
        kubernetes_host: optional(raw, EnvVar::KubernetesServiceHost),
        kubernetes_port: optional(raw, EnvVar::KubernetesServicePort),
        custom_server_url,
        client_id,
        client_secret,
        max_dispatch_queue_size: integer(raw, EnvVar::MaxDispatchQueueSize)?,
        dispatch_idle_timeout_ms: integer(raw, EnvVar::DispatchIdleTimeout)?,
        webhook_instance_timeout_ms: integer(raw, EnvVar::WebhookInstanceTimeout)?,
        podwatch_web_service_url: required(raw, EnvVar::PodwatchWebServiceUrl)?,
        external_kubernetes_proxy_host: required(raw, EnvVar::ExternalKubernetesProxyHost)?,
    })
}

/// Validate a snapshot using the standard [`Defaults`].
///
/// # Errors
///
/// Returns a [`ValidationFailure`] listing every violated rule.
///
/// # Examples
///
/// ```rust
/// use podwatch_config::core::{DeploymentMode, EnvVar, RawEnvironment, validate};
///
/// let raw = RawEnvironment::new()
///     .with(EnvVar::KubernetesServiceHost, "10.0.0.1")
///     .with(EnvVar::KubernetesServicePort, "443")
///     .with(EnvVar::PodwatchCustomServerUrl, "https://x")
///     .with(EnvVar::PodwatchWebServiceUrl, "https://svc")
///     .with(EnvVar::ExternalKubernetesProxyHost, "http://host");
///
/// let validated = validate(&raw).unwrap();
/// assert_eq!(validated.config.deployment_mode, DeploymentMode::InCluster);
/// assert!(validated.warnings.is_empty());
/// ```
pub fn validate(raw: &RawEnvironment) -> Result<Validated, ValidationFailure> {
    validate_with(raw, &Defaults::default())
}

/// Validate a snapshot after substituting `defaults` for absent variables.
///
/// # Errors
///
/// Returns a [`ValidationFailure`] listing every violated rule, together
/// with any warnings raised by the same pass.
pub fn validate_with(
    raw: &RawEnvironment,
    defaults: &Defaults,
) -> Result<Validated, ValidationFailure> {
    let raw = defaults.apply(raw);

    let mut findings = Findings::default();
    for rule in RULES {
        rule.evaluate(&raw, &mut findings);
    }

    if !findings.errors.is_empty() {
        return Err(ValidationFailure::new(findings.errors, findings.warnings));
    }

    match build(&raw) {
        Ok(config) => Ok(Validated {
            config,
            warnings: findings.warnings,
        }),
        Err(err) => Err(ValidationFailure::new(vec![err], findings.warnings)),
    }
}
