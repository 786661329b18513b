//! HTTP Probe - reqwest-based HealthProbe Implementation
//!
//! Issues plain GETs against the backend's health endpoint and a trivial
//! real data endpoint. Any 2xx counts as success; everything else maps
//! into the port's error taxonomy. Health requests carry a shorter
//! per-request timeout than ordinary API calls so a sleeping backend is
//! detected quickly.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, trace};

use crate::config::ApiConfig;
use crate::ports::{HealthProbe, ProbeError};

/// HTTP probe against a configured backend.
pub struct HttpProbe {
    /// Underlying HTTP client. Carries the general timeout.
    http: Client,
    /// Backend base URL, no trailing slash.
    base_url: String,
    /// Health endpoint path.
    health_path: String,
    /// Trivial data endpoint path.
    data_path: String,
    /// Per-request timeout for health probes.
    health_timeout: Duration,
}

impl HttpProbe {
    /// Build a probe from the API configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(2)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            health_path: config.health_path.clone(),
            data_path: config.data_path.clone(),
            health_timeout: config.health_timeout(),
        })
    }

    /// GET `path` and require a 2xx, with an optional per-request timeout
    /// overriding the client default.
    async fn get_expecting_ok(
        &self,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<(), ProbeError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.get(&url);
        if let Some(t) = timeout {
            request = request.timeout(t);
        }

        let response = request.send().await.map_err(map_send_error)?;
        let status = response.status();
        trace!(url = %url, status = status.as_u16(), "Probe response");

        if status.is_success() {
            Ok(())
        } else {
            Err(ProbeError::Status {
                code: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl HealthProbe for HttpProbe {
    async fn check_health(&self) -> Result<(), ProbeError> {
        debug!(path = %self.health_path, "Health probe");
        self.get_expecting_ok(&self.health_path, Some(self.health_timeout))
            .await
    }

    async fn check_data_readiness(&self) -> Result<(), ProbeError> {
        debug!(path = %self.data_path, "Data-readiness probe");
        self.get_expecting_ok(&self.data_path, None).await
    }
}

/// Map a reqwest send error into the port taxonomy.
fn map_send_error(e: reqwest::Error) -> ProbeError {
    if e.is_timeout() {
        ProbeError::Timeout
    } else {
        ProbeError::Unreachable(e.to_string())
    }
}
