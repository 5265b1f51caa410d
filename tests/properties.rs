//! Property-based tests for the validator.
//!
//! Uses proptest to generate arbitrary snapshots and check the invariants
//! that must hold for every input.

use podwatch_config::prelude::*;
use proptest::prelude::*;

/// Strategy for a value: mostly well-formed, sometimes junk.
fn any_value() -> impl Strategy<Value = String> {
    prop_oneof![
        "-?[0-9]{1,6}",
        "[a-z:/.]{1,12}",
        Just("https://svc".to_string()),
        Just(String::new()),
    ]
}

/// Strategy for a snapshot where each variable is independently set or not.
fn any_environment() -> impl Strategy<Value = RawEnvironment> {
    proptest::collection::vec(proptest::option::of(any_value()), EnvVar::ALL.len()).prop_map(
        |values| {
            EnvVar::ALL
                .into_iter()
                .zip(values)
                .filter_map(|(key, value)| value.map(|v| (key, v)))
                .collect::<RawEnvironment>()
        },
    )
}

fn missing_paired(failure: &ValidationFailure, key: EnvVar) -> bool {
    failure.contains(ValidationErrorKind::MissingPairedVariable, key)
}

proptest! {
    #[test]
    fn validation_is_deterministic(raw in any_environment()) {
        prop_assert_eq!(validate(&raw), validate(&raw.clone()));
    }

    #[test]
    fn integer_pattern_is_accepted(n in -9_007_199_254_740_991i64..=9_007_199_254_740_991i64) {
        let raw = RawEnvironment::new()
            .with(EnvVar::KubernetesServiceHost, "10.0.0.1")
            .with(EnvVar::KubernetesServicePort, "443")
            .with(EnvVar::PodwatchCustomServerUrl, "https://x")
            .with(EnvVar::PodwatchWebServiceUrl, "https://svc")
            .with(EnvVar::ExternalKubernetesProxyHost, "http://host")
            .with(EnvVar::MaxDispatchQueueSize, n.to_string());

        let validated = validate(&raw).unwrap();
        prop_assert_eq!(validated.config.max_dispatch_queue_size, n);
    }

    #[test]
    fn non_integer_values_are_rejected(value in "[0-9]*[a-z. +][0-9a-z]*") {
        let raw = RawEnvironment::new().with(EnvVar::DispatchIdleTimeout, value);
        let failure = validate(&raw).unwrap_err();
        prop_assert!(failure.contains(
            ValidationErrorKind::InvalidFormat,
            EnvVar::DispatchIdleTimeout
        ));
    }

    #[test]
    fn pairs_are_symmetric(raw in any_environment()) {
        let pairs = [
            (EnvVar::KubernetesServiceHost, EnvVar::KubernetesServicePort),
            (EnvVar::PodwatchServiceAccountToken, EnvVar::PodwatchPort),
            (EnvVar::PodwatchClientId, EnvVar::PodwatchClientSecret),
        ];

        match validate(&raw) {
            Ok(_) => {
                for (a, b) in pairs {
                    prop_assert_eq!(raw.is_present(a), raw.is_present(b));
                }
            }
            Err(failure) => {
                for (a, b) in pairs {
                    let broken = raw.is_present(a) != raw.is_present(b);
                    prop_assert_eq!(broken, missing_paired(&failure, a) || missing_paired(&failure, b));
                }
            }
        }
    }

    #[test]
    fn deployment_mode_follows_kubernetes_host(raw in any_environment()) {
        if let Ok(validated) = validate(&raw) {
            let in_cluster = raw.is_present(EnvVar::KubernetesServiceHost);
            prop_assert_eq!(validated.config.is_in_cluster(), in_cluster);
            prop_assert_eq!(validated.config.listen_port.is_some(), !in_cluster);
            prop_assert_eq!(validated.config.service_account_token.is_some(), !in_cluster);
            prop_assert_eq!(
                validated.config.client_id.is_some(),
                !raw.is_present(EnvVar::PodwatchCustomServerUrl)
            );
        }
    }

    #[test]
    fn warnings_only_name_supplied_variables(raw in any_environment()) {
        let warnings = match validate(&raw) {
            Ok(validated) => validated.warnings,
            Err(failure) => failure.warnings().to_vec(),
        };
        for warning in warnings {
            prop_assert!(raw.is_present(warning.key));
            let governor = match warning.code {
                WarningCode::ExternalHost => EnvVar::KubernetesServiceHost,
                WarningCode::CustomServer => EnvVar::PodwatchCustomServerUrl,
            };
            prop_assert!(raw.is_present(governor));
        }
    }
}
