//! Geocoding service transports

use crate::config::GeocoderConfig;
use crate::error::{GeoResolveError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Raw access to a geocoding service; parsing lives in the `Geocoder`
#[async_trait]
pub trait GeocodingTransport: Send + Sync {
    /// Forward search for a place name, returning the raw JSON payload
    async fn search(&self, query: &str) -> Result<Value>;

    /// Reverse lookup of a coordinate, returning the raw JSON payload
    async fn reverse(&self, lat: f64, lon: f64) -> Result<Value>;
}

/// Nominatim HTTP API
pub struct NominatimTransport {
    http_client: reqwest::Client,
    base_url: String,
}

impl NominatimTransport {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(GeoResolveError::Http)?;

        Ok(Self {
            http_client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let response = self
            .http_client
            .get(format!("{}/{}", self.base_url, path))
            .query(query)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

#[async_trait]
impl GeocodingTransport for NominatimTransport {
    async fn search(&self, query: &str) -> Result<Value> {
        self.get_json(
            "search",
            &[
                ("q", query.to_string()),
                ("format", "json".to_string()),
                ("limit", "1".to_string()),
                ("polygon_geojson", "1".to_string()),
            ],
        )
        .await
    }

    async fn reverse(&self, lat: f64, lon: f64) -> Result<Value> {
        self.get_json(
            "reverse",
            &[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("format", "json".to_string()),
            ],
        )
        .await
    }
}
