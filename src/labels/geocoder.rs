//! Reverse geocoding of cluster centroids.

use crate::config::GeocodingConfig;
use crate::constants::geocoding::CONNECT_TIMEOUT_SECS;
use crate::error::{Error, Result};
use futures_util::future::BoxFuture;
use serde::Deserialize;
use std::time::Duration;

/// Resolves a coordinate to a display name.
pub trait Geocoder: Send + Sync {
    /// Look up the place at `(lon, lat)`.
    ///
    /// `Ok(None)` means the service answered but found no place.
    fn reverse_geocode(&self, lon: f64, lat: f64) -> BoxFuture<'_, Result<Option<String>>>;
}

/// Mapbox Geocoding v5 client.
#[derive(Clone)]
pub struct MapboxGeocoder {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    place_types: String,
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    features: Vec<PlaceFeature>,
}

#[derive(Debug, Deserialize)]
struct PlaceFeature {
    place_name: String,
}

impl MapboxGeocoder {
    /// Build a client from config. Requires an access token.
    pub fn from_config(config: &GeocodingConfig) -> Result<Self> {
        let access_token = config.resolve_token().ok_or(Error::GeocoderTokenMissing)?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Internal {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            access_token,
            place_types: config.place_types.clone(),
        })
    }

    /// Request URL for a coordinate, without query parameters.
    fn url_for(&self, lon: f64, lat: f64) -> String {
        format!("{}/{lon},{lat}.json", self.endpoint)
    }

    fn request_url(&self, lon: f64, lat: f64) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.url_for(lon, lat)).map_err(|e| Error::Internal {
            message: format!("invalid geocoding endpoint '{}': {e}", self.endpoint),
        })?;
        url.query_pairs_mut()
            .append_pair("types", &self.place_types)
            .append_pair("limit", "1")
            .append_pair("access_token", &self.access_token);
        Ok(url)
    }

    async fn lookup(&self, lon: f64, lat: f64) -> Result<Option<String>> {
        let response = self
            .client
            .get(self.request_url(lon, lat)?)
            .send()
            .await
            .map_err(|e| Error::GeocodeRequest {
                source: e.without_url(),
            })?;

        if !response.status().is_success() {
            return Err(Error::GeocodeStatus {
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| Error::GeocodeRequest {
            source: e.without_url(),
        })?;
        parse_place_name(&body)
    }
}

impl Geocoder for MapboxGeocoder {
    fn reverse_geocode(&self, lon: f64, lat: f64) -> BoxFuture<'_, Result<Option<String>>> {
        Box::pin(self.lookup(lon, lat))
    }
}

/// Display name of the first place in a places response.
pub fn parse_place_name(body: &str) -> Result<Option<String>> {
    let response: PlacesResponse = serde_json::from_str(body).map_err(|e| Error::GeocodeDecode {
        reason: e.to_string(),
    })?;
    Ok(response.features.into_iter().next().map(|f| f.place_name))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config_with_token() -> GeocodingConfig {
        GeocodingConfig {
            access_token: Some("pk.test".to_string()),
            endpoint: "https://geo.example.org/places/".to_string(),
            ..GeocodingConfig::default()
        }
    }

    #[test]
    fn test_parse_first_place() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [
                {"place_name": "Boston, Massachusetts, United States", "place_type": ["place"]},
                {"place_name": "Somewhere else"}
            ]
        }"#;
        assert_eq!(
            parse_place_name(body).unwrap().as_deref(),
            Some("Boston, Massachusetts, United States")
        );
    }

    #[test]
    fn test_parse_no_features() {
        assert_eq!(parse_place_name(r#"{"features": []}"#).unwrap(), None);
        assert_eq!(parse_place_name("{}").unwrap(), None);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_place_name("<html>"),
            Err(Error::GeocodeDecode { .. })
        ));
    }

    #[test]
    fn test_url_is_longitude_first() {
        let geocoder = MapboxGeocoder::from_config(&config_with_token()).unwrap();
        assert_eq!(
            geocoder.url_for(-71.09, 42.34),
            "https://geo.example.org/places/-71.09,42.34.json"
        );
    }

    #[test]
    fn test_request_url_carries_query() {
        let geocoder = MapboxGeocoder::from_config(&config_with_token()).unwrap();
        let url = geocoder.request_url(-71.09, 42.34).unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("types=place"));
        assert!(query.contains("limit=1"));
        assert!(query.contains("access_token=pk.test"));
    }
}
