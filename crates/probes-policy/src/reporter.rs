use kubewarden_policy_sdk::{settings::SettingsValidationResponse, wapc_guest::CallResult};
use slog::{Logger, error, info, warn};

use crate::errors::{PolicyError, Severity};
use crate::settings::{Settings, SettingsError};

/// Status code attached to the rejection of a deployment
pub const BAD_REQUEST: u16 = 400;

/// Final answer of the policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject {
        message: String,
        code: Option<u16>,
    },
}

impl Decision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accept)
    }

    /// Encode the decision as the response of a `validate` call
    pub fn into_validation_response(self) -> CallResult {
        match self {
            Decision::Accept => kubewarden_policy_sdk::accept_request(),
            Decision::Reject { message, code } => {
                kubewarden_policy_sdk::reject_request(Some(message), code, None, None)
            }
        }
    }

    /// Encode the decision as the response of a `validate_settings` call.
    /// Settings responses do not carry a status code.
    pub fn into_settings_response(self) -> CallResult {
        let response = match self {
            Decision::Accept => SettingsValidationResponse {
                valid: true,
                message: None,
            },
            Decision::Reject { message, .. } => SettingsValidationResponse {
                valid: false,
                message: Some(message),
            },
        };
        Ok(serde_json::to_vec(&response)?)
    }
}

pub fn report_validation(outcome: &Result<(), PolicyError>, logger: &Logger) -> Decision {
    let err = match outcome {
        Ok(()) => {
            info!(logger, "deployment validation succeeded");
            return Decision::Accept;
        }
        Err(err) => err,
    };

    match (err, err.severity()) {
        (PolicyError::RequestDecode(_), _) => {
            error!(logger, "cannot unmarshal validation request"; "error" => %err)
        }
        (PolicyError::Settings(SettingsError::Decode(_)), _) => {
            error!(logger, "cannot unmarshal settings"; "error" => %err)
        }
        (_, Severity::Error) => error!(logger, "settings validation failed"; "error" => %err),
        (_, Severity::Warning) => warn!(logger, "deployment validation failed"; "error" => %err),
    }

    Decision::Reject {
        message: err.to_string(),
        code: Some(BAD_REQUEST),
    }
}

pub fn report_settings_validation(
    outcome: &Result<Settings, SettingsError>,
    logger: &Logger,
) -> Decision {
    match outcome {
        Ok(_) => {
            info!(logger, "settings validation succeeded");
            Decision::Accept
        }
        Err(err) => {
            if matches!(err, SettingsError::Decode(_)) {
                error!(logger, "cannot unmarshal settings"; "error" => %err);
            } else {
                error!(logger, "settings validation failed"; "error" => %err);
            }
            Decision::Reject {
                message: err.to_string(),
                code: None,
            }
        }
    }
}
