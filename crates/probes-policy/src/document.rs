//! Read-only projections over the raw object received with an admission
//! request.
//!
//! The object is never deserialized into a Kubernetes type: admission payloads
//! vary between Kubernetes versions and webhook configurations, only the
//! fields relevant to probes are looked up.

use serde_json::Value;
use thiserror::Error;

use crate::settings::ProbeKind;

pub const CONTAINERS_PATH: &str = "spec.template.spec.containers";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("invalid deployment: missing containers")]
    MissingContainers,

    #[error("invalid deployment: containers must be an array")]
    NotAnArray,

    #[error("no containers found in deployment")]
    EmptyContainers,
}

/// Walk a dotted `path` inside of `node`. Objects are entered by key, arrays by
/// numeric index. A key holding `null` is considered present.
pub fn lookup<'a>(node: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(node, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Returns the containers of the pod template, in document order
pub fn containers(document: &Value) -> Result<Vec<ContainerView<'_>>, DocumentError> {
    let containers = lookup(document, CONTAINERS_PATH).ok_or(DocumentError::MissingContainers)?;
    let containers = containers.as_array().ok_or(DocumentError::NotAnArray)?;
    if containers.is_empty() {
        return Err(DocumentError::EmptyContainers);
    }

    Ok(containers.iter().map(ContainerView).collect())
}

#[derive(Debug, Clone, Copy)]
pub struct ContainerView<'a>(&'a Value);

impl<'a> From<&'a Value> for ContainerView<'a> {
    fn from(container: &'a Value) -> Self {
        ContainerView(container)
    }
}

impl<'a> ContainerView<'a> {
    /// The name of the container, empty when not set
    pub fn name(&self) -> String {
        match lookup(self.0, "name") {
            Some(Value::String(name)) => name.clone(),
            Some(value @ (Value::Number(_) | Value::Bool(_))) => value.to_string(),
            _ => String::new(),
        }
    }

    pub fn probe(&self, kind: ProbeKind) -> Option<ProbeView<'a>> {
        lookup(self.0, kind.container_key()).map(ProbeView)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProbeView<'a>(&'a Value);

impl ProbeView<'_> {
    pub fn period_seconds(&self) -> i64 {
        integer_field(self.0, "periodSeconds")
    }

    pub fn timeout_seconds(&self) -> i64 {
        integer_field(self.0, "timeoutSeconds")
    }
}

// 0 when the field is missing or cannot be read as a number
fn integer_field(node: &Value, path: &str) -> i64 {
    match lookup(node, path) {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_u64().map(|_| i64::MAX))
            .or_else(|| number.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or_default(),
        Some(Value::String(text)) => text
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| text.trim().parse::<f64>().ok().map(|f| f.trunc() as i64))
            .unwrap_or_default(),
        Some(Value::Bool(true)) => 1,
        _ => 0,
    }
}
