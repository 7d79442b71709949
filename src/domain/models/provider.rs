//! Metrics providers, value templates and the messages exchanged between
//! workers, backend consumers and the result aggregator.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::objective::ObjectReference;

/// Kind of external metrics system a provider talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BackendType {
    Prometheus,
    Thanos,
    Cortex,
    Dynatrace,
    DynatraceDql,
    Datadog,
    Elastic,
    Dummy,
}

impl BackendType {
    pub const ALL: [BackendType; 8] = [
        BackendType::Prometheus,
        BackendType::Thanos,
        BackendType::Cortex,
        BackendType::Dynatrace,
        BackendType::DynatraceDql,
        BackendType::Datadog,
        BackendType::Elastic,
        BackendType::Dummy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Prometheus => "prometheus",
            BackendType::Thanos => "thanos",
            BackendType::Cortex => "cortex",
            BackendType::Dynatrace => "dynatrace",
            BackendType::DynatraceDql => "dql",
            BackendType::Datadog => "datadog",
            BackendType::Elastic => "elastic",
            BackendType::Dummy => "dummy",
        }
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        BackendType::ALL
            .into_iter()
            .find(|t| t.as_str() == lowered)
            .ok_or_else(|| format!("unknown backend type: {}", s))
    }
}

impl Serialize for BackendType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BackendType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Connection descriptor for one metrics backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsProvider {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(rename = "type")]
    pub backend_type: BackendType,
    pub target_server: String,
    #[serde(default)]
    pub insecure_skip_tls_verify: bool,
}

impl MetricsProvider {
    pub fn new(
        name: impl Into<String>,
        backend_type: BackendType,
        target_server: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: String::new(),
            backend_type,
            target_server: target_server.into(),
            insecure_skip_tls_verify: false,
        }
    }
}

/// Query template bound to a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueTemplate {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub provider: ObjectReference,
    pub query: String,
}

/// Unit of work routed to a backend consumer.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// Objective reference exactly as written in the definition.
    pub objective: ObjectReference,
    pub query: String,
    pub provider: MetricsProvider,
}

/// Outcome of resolving and fetching one objective's value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResult {
    #[serde(rename = "objectiveReference")]
    pub objective: ObjectReference,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err_msg: Option<String>,
}

impl ProviderResult {
    pub fn success(
        objective: ObjectReference,
        value: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            objective,
            value: value.into(),
            query: query.into(),
            err_msg: None,
        }
    }

    pub fn failure(
        objective: ObjectReference,
        query: impl Into<String>,
        err_msg: impl Into<String>,
    ) -> Self {
        Self {
            objective,
            value: String::new(),
            query: query.into(),
            err_msg: Some(err_msg.into()),
        }
    }

    pub fn key(&self) -> String {
        self.objective.key()
    }

    pub fn is_error(&self) -> bool {
        self.err_msg.is_some()
    }
}
