//! Geocoding and weather service adapters
//!
//! The weather handler talks to the outside world only through the
//! [`Geocoder`] and [`WeatherProvider`] traits. [`OpenMeteoClient`] implements
//! both against the Open-Meteo HTTP APIs.

use alertcore::{Coordinates, NodeError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Resolves a free-text place name to coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// All matches, best first. An empty list is not an error here.
    async fn locate(&self, place: &str) -> Result<Vec<Coordinates>, NodeError>;
}

/// Reads the current temperature from a fully substituted endpoint URL
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_temperature(&self, url: &str) -> Result<f64, NodeError>;
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
}

/// Decode a geocoding response body
pub fn decode_geocoding(body: &[u8]) -> Result<Vec<Coordinates>, NodeError> {
    let response: GeocodingResponse = serde_json::from_slice(body)
        .map_err(|e| NodeError::ResponseDecode(e.to_string()))?;
    Ok(response
        .results
        .into_iter()
        .map(|r| Coordinates {
            latitude: r.latitude,
            longitude: r.longitude,
        })
        .collect())
}

/// Decode a weather response body into degrees Celsius
pub fn decode_weather(body: &[u8]) -> Result<f64, NodeError> {
    let response: WeatherResponse = serde_json::from_slice(body)
        .map_err(|e| NodeError::ResponseDecode(e.to_string()))?;
    Ok(response.current_weather.temperature)
}

/// Settings for [`OpenMeteoClient`]
#[derive(Debug, Clone)]
pub struct OpenMeteoConfig {
    pub geocoding_url: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            timeout: None,
            user_agent: concat!("alertflow/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Open-Meteo backed geocoder and weather provider
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    geocoding_url: String,
}

impl OpenMeteoClient {
    pub fn new(config: OpenMeteoConfig) -> Result<Self, NodeError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| NodeError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            geocoding_url: config.geocoding_url,
        })
    }
}

#[async_trait]
impl Geocoder for OpenMeteoClient {
    async fn locate(&self, place: &str) -> Result<Vec<Coordinates>, NodeError> {
        tracing::debug!("GET {} name={}", self.geocoding_url, place);

        let response = self
            .client
            .get(&self.geocoding_url)
            .query(&[("name", place), ("count", "1")])
            .send()
            .await
            .map_err(|e| NodeError::GeocodingRequest(e.to_string()))?;

        // Error bodies carry no `results`, so they must not reach the decoder
        let status = response.status();
        if !status.is_success() {
            return Err(NodeError::GeocodingRequest(format!("status {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| NodeError::GeocodingRequest(e.to_string()))?;

        decode_geocoding(&body)
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn current_temperature(&self, url: &str) -> Result<f64, NodeError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NodeError::WeatherRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NodeError::WeatherStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| NodeError::WeatherRequest(e.to_string()))?;

        decode_weather(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocoding_takes_coordinates_in_order() {
        let body = br#"{"results": [
            {"id": 1, "name": "Melbourne", "latitude": -37.814, "longitude": 144.96332},
            {"id": 2, "name": "Melbourne", "latitude": 28.08363, "longitude": -80.60811}
        ], "generationtime_ms": 0.5}"#;
        let found = decode_geocoding(body).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].latitude, -37.814);
        assert_eq!(found[0].longitude, 144.96332);
    }

    #[test]
    fn geocoding_without_results_is_empty() {
        assert!(decode_geocoding(br#"{"generationtime_ms": 0.2}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn weather_reads_current_temperature() {
        let body = br#"{"latitude": -37.8, "current_weather": {"temperature": 18.4, "windspeed": 9.1}}"#;
        assert_eq!(decode_weather(body).unwrap(), 18.4);
    }

    #[test]
    fn malformed_bodies_are_decode_errors() {
        assert!(matches!(
            decode_weather(b"<html>"),
            Err(NodeError::ResponseDecode(_))
        ));
        assert!(matches!(
            decode_geocoding(b"not json"),
            Err(NodeError::ResponseDecode(_))
        ));
    }

    #[test]
    fn client_builds_from_default_config() {
        assert!(OpenMeteoClient::new(OpenMeteoConfig::default()).is_ok());
    }
}
