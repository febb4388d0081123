//! Configuration type definitions.

use crate::constants::{clustering, geocoding};
use crate::spatial::ClusterParams;
use serde::{Deserialize, Serialize};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Clustering parameters.
    pub clustering: ClusteringConfig,

    /// Reverse geocoding settings.
    pub geocoding: GeocodingConfig,

    /// Default snapshot source.
    pub snapshot: SnapshotConfig,

    /// Default location filter.
    pub filter: FilterConfig,
}

/// DBSCAN parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Neighbourhood radius in kilometres.
    pub max_distance_km: f64,

    /// Minimum neighbourhood size (including the point itself) for a core point.
    pub min_points: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            max_distance_km: clustering::DEFAULT_MAX_DISTANCE_KM,
            min_points: clustering::DEFAULT_MIN_POINTS,
        }
    }
}

impl From<ClusteringConfig> for ClusterParams {
    fn from(config: ClusteringConfig) -> Self {
        Self {
            max_distance_km: config.max_distance_km,
            min_points: config.min_points,
        }
    }
}

/// Reverse geocoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// Whether cluster labels are looked up at all.
    pub enabled: bool,

    /// Base URL of the places endpoint.
    pub endpoint: String,

    /// Access token. Falls back to `MAPBOX_ACCESS_TOKEN` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Comma-separated place types to request.
    pub place_types: String,

    /// Total request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: geocoding::DEFAULT_ENDPOINT.to_string(),
            access_token: None,
            place_types: geocoding::DEFAULT_PLACE_TYPES.to_string(),
            timeout_secs: geocoding::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GeocodingConfig {
    /// Resolve the access token from config, then the environment.
    pub fn resolve_token(&self) -> Option<String> {
        self.access_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                std::env::var(geocoding::TOKEN_ENV)
                    .ok()
                    .filter(|t| !t.trim().is_empty())
            })
    }
}

/// Default snapshot source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// File path or `http(s)://` URL of the latest-readings snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Default location filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Location names admitted to clustering. `None` admits every sensor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
}
