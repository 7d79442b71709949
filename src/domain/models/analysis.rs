//! Analysis requests: the definition to evaluate, the query arguments and the
//! timeframe the queries cover.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::objective::ObjectReference;
use crate::domain::errors::{AnalysisError, DomainResult};

/// Time range covered by the analysis queries.
///
/// `recent_secs` takes precedence over the fixed `from`/`to` bounds and
/// describes a window ending now.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeframe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_secs: Option<u64>,
}

impl Timeframe {
    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            recent_secs: None,
        }
    }

    pub fn recent(secs: u64) -> Self {
        Self {
            from: None,
            to: None,
            recent_secs: Some(secs),
        }
    }

    /// Start of the window relative to `now`.
    ///
    /// Fails when `recent_secs` reaches past the representable time range.
    pub fn from_at(&self, now: DateTime<Utc>) -> DomainResult<DateTime<Utc>> {
        match self.recent_secs {
            Some(secs) if secs > 0 => i64::try_from(secs)
                .ok()
                .and_then(Duration::try_seconds)
                .and_then(|window| now.checked_sub_signed(window))
                .ok_or_else(|| {
                    AnalysisError::InvalidTimeframe(format!(
                        "recent window of {secs}s is out of range"
                    ))
                }),
            _ => Ok(self.from.unwrap_or(now)),
        }
    }

    /// End of the window relative to `now`.
    pub fn to_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.recent_secs {
            Some(secs) if secs > 0 => now,
            _ => self.to.unwrap_or(now),
        }
    }

    /// Resolves the window against the current time.
    pub fn resolve(&self) -> DomainResult<(DateTime<Utc>, DateTime<Utc>)> {
        let now = Utc::now();
        Ok((self.from_at(now)?, self.to_at(now)))
    }
}

/// A request to evaluate an analysis definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub analysis_definition: ObjectReference,
    /// Values substituted into the `{{placeholder}}`s of each query.
    #[serde(default)]
    pub args: HashMap<String, String>,
    #[serde(default)]
    pub timeframe: Timeframe,
}

impl Analysis {
    pub fn new(name: impl Into<String>, definition: ObjectReference) -> Self {
        Self {
            name: name.into(),
            analysis_definition: definition,
            ..Default::default()
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    pub fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = timeframe;
        self
    }
}
