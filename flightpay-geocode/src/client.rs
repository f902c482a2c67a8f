use std::time::Duration;

use async_trait::async_trait;
use flightpay_core::models::Coordinate;
use flightpay_core::resolve::JurisdictionResolver;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Public endpoint of the Google reverse-geocoding API.
pub const DEFAULT_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Result type requested from the geocoder. Narrowing the response to
/// state-level components keeps payloads small and extraction simple.
const ADMIN_AREA_TYPE: &str = "administrative_area_level_1";

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Geocoding service returned status '{0}'")]
    Status(String),
}

/// Connection settings for the reverse-geocoding service.
#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    pub base_url: String,
    /// API key sent with each request. Lookups work without one against
    /// mock servers, so it stays optional.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEOCODE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    short_name: String,
    types: Vec<String>,
}

fn first_admin_area(results: &[GeocodeResult]) -> Option<String> {
    results
        .first()?
        .address_components
        .iter()
        .find(|component| component.types.iter().any(|t| t == ADMIN_AREA_TYPE))
        .map(|component| component.short_name.clone())
}

fn state_from_response(response: GeocodeResponse) -> Result<Option<String>, GeocodeError> {
    match response.status.as_str() {
        "OK" => Ok(first_admin_area(&response.results)),
        "ZERO_RESULTS" => Ok(None),
        other => Err(GeocodeError::Status(other.to_string())),
    }
}

/// HTTP client for resolving coordinates to state codes.
pub struct GeocodeClient {
    client: reqwest::Client,
    config: GeocodeConfig,
}

impl GeocodeClient {
    pub fn new(config: GeocodeConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Looks up the two-letter state code covering the given coordinates.
    ///
    /// Returns `Ok(None)` when the point falls outside any state-level
    /// jurisdiction, such as open water or foreign territory.
    pub async fn state_code(&self, lat: f64, lon: f64) -> Result<Option<String>, GeocodeError> {
        let mut request = self.client.get(&self.config.base_url).query(&[
            ("latlng", format!("{lat},{lon}")),
            ("result_type", ADMIN_AREA_TYPE.to_string()),
        ]);
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request
            .send()
            .await?
            .error_for_status()?
            .json::<GeocodeResponse>()
            .await?;

        state_from_response(response)
    }
}

#[async_trait]
impl JurisdictionResolver for GeocodeClient {
    async fn resolve(&self, coordinate: Coordinate) -> Option<String> {
        match self.state_code(coordinate.lat, coordinate.lon).await {
            Ok(state) => state,
            Err(error) => {
                warn!(
                    lat = coordinate.lat,
                    lon = coordinate.lon,
                    %error,
                    "Reverse geocoding failed, treating waypoint as unresolved"
                );
                None
            }
        }
    }
}
