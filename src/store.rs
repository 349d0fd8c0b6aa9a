use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::config::RelayConfig;

/// Outbound client for the Supabase REST insert endpoint. One instance is
/// built at startup and shared across requests; every call is bounded by
/// the configured request timeout.
#[derive(Clone)]
pub struct StoreClient {
    client: Client,
    insert_url: String,
    api_key: String,
}

impl StoreClient {
    pub fn new(config: &RelayConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.store_timeout).build()?;
        let insert_url = format!(
            "{}/rest/v1/{}",
            config.store_url.as_str().trim_end_matches('/'),
            config.store_table
        );
        Ok(Self {
            client,
            insert_url,
            api_key: config.store_api_key.clone(),
        })
    }

    /// Insert one telemetry record. Any upstream status counts as a
    /// completed dispatch; only transport failures surface as errors.
    pub async fn insert(&self, record: &Value) -> Result<StatusCode, reqwest::Error> {
        let response = self
            .client
            .post(&self.insert_url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), body = %body, "store response");

        Ok(status)
    }
}
