//! OpenWeatherMap current-conditions client.

use std::sync::Arc;
use std::time::Duration;

use nimbus_core::{Units, WeatherConfig};
use reqwest::Client;
use tracing::instrument;

use crate::error::FetchError;
use crate::types::UpstreamPayload;

const USER_AGENT: &str = concat!("nimbus/", env!("CARGO_PKG_VERSION"));

/// Performs exactly one GET per `fetch`; no retries.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl WeatherProvider {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Unclassified(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.api_url,
            &config.api_key,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Fetch current conditions for `city`.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch(&self, city: &str, units: Units) -> Result<UpstreamPayload, FetchError> {
        tracing::debug!("Requesting current conditions from {}", self.base_url);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", units.as_param()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let payload = response.json::<UpstreamPayload>().await?;
        Ok(payload)
    }
}
