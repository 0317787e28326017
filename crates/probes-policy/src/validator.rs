use kubewarden_policy_sdk::request::ValidationRequest;
use serde_json::Value;

use crate::document::{self, ContainerView};
use crate::errors::{PolicyError, Result};
use crate::rules::{self, RuleViolation};
use crate::settings::{ProbeKind, Settings, SettingsError};

/// Decode a validation request, then check the object it carries against the
/// settings it carries.
///
/// Processing stops at the first failure: settings that cannot be decoded or
/// are inconsistent prevent any look at the object.
pub fn validate_request(payload: &[u8]) -> Result<()> {
    let validation_request: ValidationRequest<Value> =
        serde_json::from_slice(payload).map_err(PolicyError::RequestDecode)?;

    let settings = Settings::from_value(validation_request.settings)?;
    settings.validate()?;

    validate_deployment(&validation_request.request.object, &settings)
}

/// Decode and check the settings received through a settings validation call
pub fn validate_settings(payload: &[u8]) -> std::result::Result<Settings, SettingsError> {
    let settings = Settings::parse(payload)?;
    settings.validate()?;
    Ok(settings)
}

/// Check every container of the deployment, in document order. The first
/// violation found is returned.
pub fn validate_deployment(deployment: &Value, settings: &Settings) -> Result<()> {
    for container in document::containers(deployment)? {
        validate_container(&container, settings)?;
    }

    Ok(())
}

fn validate_container(
    container: &ContainerView<'_>,
    settings: &Settings,
) -> std::result::Result<(), RuleViolation> {
    let name = container.name();
    if name.is_empty() {
        return Err(RuleViolation::MissingContainerName);
    }

    ProbeKind::ALL.iter().try_for_each(|kind| {
        rules::check_probe(&name, *kind, container.probe(*kind), settings.probe(*kind))
    })
}
