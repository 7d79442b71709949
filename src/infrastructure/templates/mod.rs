//! Value-template store loaded from YAML manifests.
//!
//! A manifest lists value templates and metrics providers:
//!
//! ```yaml
//! namespace: keptn
//! providers:
//!   - name: prom
//!     type: prometheus
//!     targetServer: http://prometheus:9090
//! templates:
//!   - name: response-time
//!     provider:
//!       name: prom
//!     query: "avg(http_latency{app=\"{{.app}}\"})"
//! ```
//!
//! Entries without a namespace take the manifest's, or `default`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::domain::errors::{AnalysisError, DomainResult};
use crate::domain::models::{EvaluationContext, MetricsProvider, ObjectReference, ValueTemplate};
use crate::domain::ports::ValueTemplateResolver;

const DEFAULT_NAMESPACE: &str = "default";

/// On-disk manifest layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateManifest {
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub providers: Vec<MetricsProvider>,
    #[serde(default)]
    pub templates: Vec<ValueTemplate>,
}

type Key = (String, String);

fn key_of(reference: &ObjectReference) -> Key {
    (reference.namespace.clone(), reference.name.clone())
}

/// In-memory value templates and providers keyed by namespace and name
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateStore {
    templates: HashMap<Key, ValueTemplate>,
    providers: HashMap<Key, MetricsProvider>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a YAML manifest string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let manifest: TemplateManifest =
            serde_yaml::from_str(yaml).context("Failed to parse template manifest")?;
        let mut store = Self::new();
        store.add_manifest(manifest);
        Ok(store)
    }

    /// Build a store from a YAML manifest file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template manifest {}", path.display()))?;
        let store = Self::from_yaml_str(&contents)
            .with_context(|| format!("Invalid template manifest {}", path.display()))?;
        info!(
            path = %path.display(),
            templates = store.templates.len(),
            providers = store.providers.len(),
            "Loaded template manifest"
        );
        Ok(store)
    }

    pub fn add_manifest(&mut self, manifest: TemplateManifest) {
        let namespace = manifest
            .namespace
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        for mut provider in manifest.providers {
            if provider.namespace.is_empty() {
                provider.namespace = namespace.clone();
            }
            self.insert_provider(provider);
        }
        for mut template in manifest.templates {
            if template.namespace.is_empty() {
                template.namespace = namespace.clone();
            }
            self.insert_template(template);
        }
    }

    /// Adds or replaces a value template; its provider reference is kept as
    /// written so an empty namespace still follows the evaluation namespace.
    pub fn insert_template(&mut self, template: ValueTemplate) {
        let key = (template.namespace.clone(), template.name.clone());
        debug!(namespace = %key.0, name = %key.1, "Storing value template");
        self.templates.insert(key, template);
    }

    pub fn insert_provider(&mut self, provider: MetricsProvider) {
        let key = (provider.namespace.clone(), provider.name.clone());
        debug!(namespace = %key.0, name = %key.1, "Storing metrics provider");
        self.providers.insert(key, provider);
    }

    pub fn with_template(mut self, template: ValueTemplate) -> Self {
        self.insert_template(template);
        self
    }

    pub fn with_provider(mut self, provider: MetricsProvider) -> Self {
        self.insert_provider(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[async_trait]
impl ValueTemplateResolver for InMemoryTemplateStore {
    async fn value_template(
        &self,
        _ctx: &EvaluationContext,
        reference: &ObjectReference,
    ) -> DomainResult<ValueTemplate> {
        self.templates
            .get(&key_of(reference))
            .cloned()
            .ok_or_else(|| AnalysisError::TemplateNotFound(reference.to_string()))
    }

    async fn provider(
        &self,
        _ctx: &EvaluationContext,
        reference: &ObjectReference,
    ) -> DomainResult<MetricsProvider> {
        self.providers
            .get(&key_of(reference))
            .cloned()
            .ok_or_else(|| AnalysisError::ProviderNotFound(reference.to_string()))
    }
}
