use std::time::Duration;

use reqwest::header::USER_AGENT;

use crate::error::{AppError, AppResult};

/// Reverse-geocoding client for a Nominatim-compatible service.
pub struct GeocodeClient {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
    timeout: Duration,
}

impl GeocodeClient {
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        user_agent: String,
        timeout: Duration,
    ) -> Self {
        Self { client, base_url, user_agent, timeout }
    }

    /// Returns the upstream JSON document untouched.
    pub async fn reverse(&self, lat: f64, lon: f64) -> AppResult<serde_json::Value> {
        let url = format!("{}/reverse", self.base_url.trim_end_matches('/'));

        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .timeout(self.timeout)
            .query(&[("format", "jsonv2")])
            .query(&[("lat", lat), ("lon", lon)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%status, lat, lon, "geocoder returned an error status");
            return Err(AppError::Upstream(format!("geocoder responded with {status}")));
        }

        Ok(resp.json().await?)
    }
}
