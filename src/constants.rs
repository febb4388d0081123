//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "ecohub";

/// Clustering defaults.
pub mod clustering {
    /// Default DBSCAN neighbourhood radius in kilometres.
    ///
    /// Deployments have used both 1 km and 0.5 km; this is only the
    /// starting value written to a fresh config file.
    pub const DEFAULT_MAX_DISTANCE_KM: f64 = 0.5;

    /// Default minimum neighbourhood size for a core point.
    ///
    /// With a value of 1 every point can found its own cluster.
    pub const DEFAULT_MIN_POINTS: usize = 1;
}

/// Label text shown for each enrichment state.
pub mod labels {
    /// Label while a lookup is in flight.
    pub const LOADING: &str = "Loading...";
    /// Label when the lookup succeeded but returned no place.
    pub const NEARBY_FALLBACK: &str = "Nearby Location";
    /// Label when the lookup failed.
    pub const ERROR: &str = "Error fetching label";
}

/// Reverse geocoding defaults.
pub mod geocoding {
    /// Mapbox Geocoding v5 places endpoint.
    pub const DEFAULT_ENDPOINT: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";
    /// Place types requested from the geocoder.
    pub const DEFAULT_PLACE_TYPES: &str = "place";
    /// Total request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
    /// Connect timeout in seconds.
    pub const CONNECT_TIMEOUT_SECS: u64 = 5;
    /// Environment variable holding the access token.
    pub const TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";
}

/// Snapshot fetch settings.
pub mod snapshot {
    /// Total HTTP timeout in seconds for snapshot downloads.
    pub const FETCH_TIMEOUT_SECS: u64 = 30;
    /// Connect timeout in seconds for snapshot downloads.
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
}

/// Coordinate decimal places used in text and CSV output.
pub const COORD_DECIMAL_PLACES: usize = 6;
