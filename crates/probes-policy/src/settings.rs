use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The three kinds of container probe the policy knows about. The order of
/// [`ProbeKind::ALL`] is the order in which probes are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    Liveness,
    Readiness,
    Startup,
}

impl ProbeKind {
    pub const ALL: [ProbeKind; 3] = [ProbeKind::Liveness, ProbeKind::Readiness, ProbeKind::Startup];

    pub fn name(&self) -> &'static str {
        match self {
            ProbeKind::Liveness => "liveness",
            ProbeKind::Readiness => "readiness",
            ProbeKind::Startup => "startup",
        }
    }

    /// Key used inside of the policy settings
    pub fn settings_key(&self) -> &'static str {
        match self {
            ProbeKind::Liveness => "liveness_probe",
            ProbeKind::Readiness => "readiness_probe",
            ProbeKind::Startup => "startup_probe",
        }
    }

    /// Key used inside of a container spec
    pub fn container_key(&self) -> &'static str {
        match self {
            ProbeKind::Liveness => "livenessProbe",
            ProbeKind::Readiness => "readinessProbe",
            ProbeKind::Startup => "startupProbe",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot unmarshal settings: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{}: min_period_seconds must be non-negative", .0.settings_key())]
    NegativeMinPeriod(ProbeKind),

    #[error("{}: max_timeout_seconds must be non-negative", .0.settings_key())]
    NegativeMaxTimeout(ProbeKind),

    #[error("{}: min_period_seconds must be greater than max_timeout_seconds", .0.settings_key())]
    PeriodNotAboveTimeout(ProbeKind),
}

/// Policy for one probe kind. A value of `0` for the numeric thresholds
/// means the threshold is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProbeConfig {
    pub required: bool,
    pub min_period_seconds: i32,
    pub max_timeout_seconds: i32,
}

impl ProbeConfig {
    pub fn defaults_for(kind: ProbeKind) -> Self {
        ProbeConfig {
            required: !matches!(kind, ProbeKind::Startup),
            min_period_seconds: 0,
            max_timeout_seconds: 0,
        }
    }

    fn validate(&self, kind: ProbeKind) -> Result<(), SettingsError> {
        if self.min_period_seconds < 0 {
            return Err(SettingsError::NegativeMinPeriod(kind));
        }
        if self.max_timeout_seconds < 0 {
            return Err(SettingsError::NegativeMaxTimeout(kind));
        }
        if self.min_period_seconds > 0
            && self.max_timeout_seconds > 0
            && self.min_period_seconds <= self.max_timeout_seconds
        {
            return Err(SettingsError::PeriodNotAboveTimeout(kind));
        }

        Ok(())
    }
}

/// Settings of the policy, always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSettings")]
pub struct Settings {
    pub liveness_probe: ProbeConfig,
    pub readiness_probe: ProbeConfig,
    pub startup_probe: ProbeConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            liveness_probe: ProbeConfig::defaults_for(ProbeKind::Liveness),
            readiness_probe: ProbeConfig::defaults_for(ProbeKind::Readiness),
            startup_probe: ProbeConfig::defaults_for(ProbeKind::Startup),
        }
    }
}

impl Settings {
    /// Parse the settings provided by the user. A JSON `null` is handled like
    /// an empty object.
    pub fn parse(raw: &[u8]) -> Result<Settings, SettingsError> {
        let settings: Option<Settings> = serde_json::from_slice(raw)?;
        Ok(settings.unwrap_or_default())
    }

    /// Same as [`Settings::parse`], starting from an already decoded JSON value
    pub fn from_value(value: Value) -> Result<Settings, SettingsError> {
        let settings: Option<Settings> = serde_json::from_value(value)?;
        Ok(settings.unwrap_or_default())
    }

    pub fn probe(&self, kind: ProbeKind) -> &ProbeConfig {
        match kind {
            ProbeKind::Liveness => &self.liveness_probe,
            ProbeKind::Readiness => &self.readiness_probe,
            ProbeKind::Startup => &self.startup_probe,
        }
    }

    /// Ensure the thresholds are consistent. Probes are checked in evaluation
    /// order and the first error is returned.
    pub fn validate(&self) -> Result<(), SettingsError> {
        ProbeKind::ALL
            .iter()
            .try_for_each(|kind| self.probe(*kind).validate(*kind))
    }
}

// Input shape of the settings: every field is optional, missing ones are
// taken from the defaults of the probe kind.
#[derive(Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    liveness_probe: Option<RawProbeConfig>,
    readiness_probe: Option<RawProbeConfig>,
    startup_probe: Option<RawProbeConfig>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawProbeConfig {
    required: Option<bool>,
    min_period_seconds: Option<i32>,
    max_timeout_seconds: Option<i32>,
}

impl RawProbeConfig {
    fn overlay(self, kind: ProbeKind) -> ProbeConfig {
        let defaults = ProbeConfig::defaults_for(kind);
        ProbeConfig {
            required: self.required.unwrap_or(defaults.required),
            min_period_seconds: self
                .min_period_seconds
                .unwrap_or(defaults.min_period_seconds),
            max_timeout_seconds: self
                .max_timeout_seconds
                .unwrap_or(defaults.max_timeout_seconds),
        }
    }
}

impl From<RawSettings> for Settings {
    fn from(raw: RawSettings) -> Self {
        let overlay = |config: Option<RawProbeConfig>, kind| {
            config.unwrap_or_default().overlay(kind)
        };

        Settings {
            liveness_probe: overlay(raw.liveness_probe, ProbeKind::Liveness),
            readiness_probe: overlay(raw.readiness_probe, ProbeKind::Readiness),
            startup_probe: overlay(raw.startup_probe, ProbeKind::Startup),
        }
    }
}
