use guest::prelude::*;
use kubewarden_policy_sdk::wapc_guest as guest;

extern crate kubewarden_policy_sdk as kubewarden;
use kubewarden::{logging, protocol_version_guest};

use slog::{Logger, o};

pub mod document;
pub mod errors;
pub mod reporter;
pub mod rules;
pub mod settings;
pub mod validator;

use reporter::Decision;

#[unsafe(no_mangle)]
pub extern "C" fn wapc_init() {
    register_function("validate", validate);
    register_function("validate_settings", validate_settings);
    register_function("protocol_version", protocol_version_guest);
}

// Each invocation gets its own logger, nothing is shared between requests
fn host_logger() -> Logger {
    Logger::root(logging::KubewardenDrain::new(), o!("policy" => "probes-policy"))
}

fn validate(payload: &[u8]) -> CallResult {
    evaluate(payload, &host_logger()).into_validation_response()
}

fn validate_settings(payload: &[u8]) -> CallResult {
    evaluate_settings(payload, &host_logger()).into_settings_response()
}

/// Evaluate a validation request: the settings and the Deployment it carries
pub fn evaluate(payload: &[u8], logger: &Logger) -> Decision {
    let outcome = validator::validate_request(payload);
    reporter::report_validation(&outcome, logger)
}

/// Evaluate the settings given to the policy
pub fn evaluate_settings(payload: &[u8], logger: &Logger) -> Decision {
    let outcome = validator::validate_settings(payload);
    reporter::report_settings_validation(&outcome, logger)
}
