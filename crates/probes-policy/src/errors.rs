use thiserror::Error;

use crate::document::DocumentError;
use crate::rules::RuleViolation;
use crate::settings::SettingsError;

pub type Result<T> = std::result::Result<T, PolicyError>;

/// How loud a failure has to be reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The input could not be understood
    Error,
    /// The input was understood and does not comply with the policy
    Warning,
}

/// Everything that can lead to the rejection of a validation request. The
/// `Display` of each variant is the message returned to the user.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("cannot unmarshal validation request: {0}")]
    RequestDecode(#[source] serde_json::Error),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Rule(#[from] RuleViolation),
}

impl PolicyError {
    pub fn severity(&self) -> Severity {
        match self {
            PolicyError::RequestDecode(_) | PolicyError::Settings(_) => Severity::Error,
            PolicyError::Document(_) | PolicyError::Rule(_) => Severity::Warning,
        }
    }
}
