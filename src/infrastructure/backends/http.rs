//! Shared HTTP clients for backends talking to a provider's target server.

use reqwest::Client;
use std::time::Duration;

use super::error::BackendError;
use crate::domain::models::MetricsProvider;

/// One verifying and one non-verifying client, both with the same timeout.
#[derive(Debug, Clone)]
pub struct HttpClients {
    verified: Client,
    insecure: Client,
}

impl HttpClients {
    pub fn new(request_timeout: Duration) -> Result<Self, BackendError> {
        let build = |insecure: bool| {
            Client::builder()
                .timeout(request_timeout)
                .danger_accept_invalid_certs(insecure)
                .build()
                .map_err(|e| BackendError::Configuration(e.to_string()))
        };
        Ok(Self {
            verified: build(false)?,
            insecure: build(true)?,
        })
    }

    /// Client honouring the provider's TLS verification setting.
    pub fn for_provider(&self, provider: &MetricsProvider) -> &Client {
        if provider.insecure_skip_tls_verify {
            &self.insecure
        } else {
            &self.verified
        }
    }
}
