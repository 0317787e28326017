use thiserror::Error;

use crate::document::ProbeView;
use crate::settings::{ProbeConfig, ProbeKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("container name is required")]
    MissingContainerName,

    #[error("container '{container}': missing {kind} probe")]
    MissingProbe { container: String, kind: ProbeKind },

    #[error(
        "container '{container}': {kind} probe period ({period}s) is less than minimum required ({min}s)"
    )]
    PeriodTooShort {
        container: String,
        kind: ProbeKind,
        period: i64,
        min: i32,
    },

    #[error(
        "container '{container}': {kind} probe timeout ({timeout}s) exceeds maximum allowed ({max}s)"
    )]
    TimeoutTooLong {
        container: String,
        kind: ProbeKind,
        timeout: i64,
        max: i32,
    },
}

/// Check one probe of a container against the policy configured for its kind.
///
/// Absent probes have no timing to check: they are only rejected when the
/// configuration requires them.
pub fn check_probe(
    container: &str,
    kind: ProbeKind,
    probe: Option<ProbeView<'_>>,
    config: &ProbeConfig,
) -> Result<(), RuleViolation> {
    match probe {
        None if config.required => Err(RuleViolation::MissingProbe {
            container: container.to_owned(),
            kind,
        }),
        None => Ok(()),
        Some(probe) => check_timings(
            container,
            kind,
            probe.period_seconds(),
            probe.timeout_seconds(),
            config,
        ),
    }
}

fn check_timings(
    container: &str,
    kind: ProbeKind,
    period: i64,
    timeout: i64,
    config: &ProbeConfig,
) -> Result<(), RuleViolation> {
    if config.min_period_seconds > 0 && period < i64::from(config.min_period_seconds) {
        return Err(RuleViolation::PeriodTooShort {
            container: container.to_owned(),
            kind,
            period,
            min: config.min_period_seconds,
        });
    }

    if config.max_timeout_seconds > 0 && timeout > i64::from(config.max_timeout_seconds) {
        return Err(RuleViolation::TimeoutTooLong {
            container: container.to_owned(),
            kind,
            timeout,
            max: config.max_timeout_seconds,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ContainerView;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn config(required: bool, min_period_seconds: i32, max_timeout_seconds: i32) -> ProbeConfig {
        ProbeConfig {
            required,
            min_period_seconds,
            max_timeout_seconds,
        }
    }

    fn check(container: &Value, kind: ProbeKind, config: &ProbeConfig) -> Result<(), RuleViolation> {
        let view = ContainerView::from(container);
        check_probe("web", kind, view.probe(kind), config)
    }

    #[rstest]
    #[case::required_and_present(json!({"livenessProbe": {}}), config(true, 0, 0))]
    #[case::optional_and_absent(json!({}), config(false, 0, 0))]
    #[case::absent_probe_skips_timings(json!({}), config(false, 100, 1))]
    #[case::period_above_minimum(json!({"livenessProbe": {"periodSeconds": 30}}), config(true, 10, 0))]
    #[case::period_equal_to_minimum(json!({"livenessProbe": {"periodSeconds": 10}}), config(true, 10, 0))]
    #[case::timeout_below_maximum(json!({"livenessProbe": {"timeoutSeconds": 1}}), config(true, 0, 5))]
    #[case::timeout_equal_to_maximum(json!({"livenessProbe": {"timeoutSeconds": 5}}), config(true, 0, 5))]
    #[case::unconstrained(json!({"livenessProbe": {"periodSeconds": 1, "timeoutSeconds": 600}}), config(true, 0, 0))]
    #[case::missing_timeout_reads_as_zero(json!({"livenessProbe": {"periodSeconds": 30}}), config(true, 10, 5))]
    fn probe_accepted(#[case] container: Value, #[case] config: ProbeConfig) {
        assert_eq!(check(&container, ProbeKind::Liveness, &config), Ok(()));
    }

    #[rstest]
    #[case::missing_required(
        json!({}),
        ProbeKind::Readiness,
        config(true, 0, 0),
        "container 'web': missing readiness probe",
    )]
    #[case::period_too_short(
        json!({"livenessProbe": {"periodSeconds": 5}}),
        ProbeKind::Liveness,
        config(true, 10, 0),
        "container 'web': liveness probe period (5s) is less than minimum required (10s)",
    )]
    #[case::missing_period_reads_as_zero(
        json!({"startupProbe": {"timeoutSeconds": 1}}),
        ProbeKind::Startup,
        config(false, 10, 5),
        "container 'web': startup probe period (0s) is less than minimum required (10s)",
    )]
    #[case::timeout_too_long(
        json!({"livenessProbe": {"timeoutSeconds": 10}}),
        ProbeKind::Liveness,
        config(true, 0, 5),
        "container 'web': liveness probe timeout (10s) exceeds maximum allowed (5s)",
    )]
    #[case::period_checked_before_timeout(
        json!({"readinessProbe": {"periodSeconds": 2, "timeoutSeconds": 10}}),
        ProbeKind::Readiness,
        config(true, 10, 5),
        "container 'web': readiness probe period (2s) is less than minimum required (10s)",
    )]
    fn probe_rejected(
        #[case] container: Value,
        #[case] kind: ProbeKind,
        #[case] config: ProbeConfig,
        #[case] expected_message: &str,
    ) {
        let err = check(&container, kind, &config).expect_err("probe should be rejected");
        assert_eq!(err.to_string(), expected_message);
    }
}
