//! Error types for ecohub.

/// Result type alias for ecohub operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for ecohub.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// No snapshot source was given on the command line or in the config.
    #[error("no sensor snapshot source given (pass INPUT or set snapshot.source in config)")]
    NoSnapshotSource,

    /// Failed to read a snapshot file.
    #[error("failed to read sensor snapshot '{path}'")]
    SnapshotRead {
        /// Path to the snapshot file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse snapshot JSON.
    #[error("failed to parse sensor snapshot JSON")]
    SnapshotJson {
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to parse snapshot CSV.
    #[error("failed to parse sensor snapshot CSV '{path}'")]
    SnapshotCsv {
        /// Path to the snapshot file.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Snapshot body was valid JSON but not an array of readings.
    #[error("unexpected sensor snapshot format: expected a JSON array, got {found}")]
    UnexpectedSnapshotFormat {
        /// Kind of JSON value that was found instead.
        found: String,
    },

    /// Failed to fetch a snapshot over HTTP.
    #[error("failed to fetch sensor snapshot from '{url}'")]
    SnapshotFetch {
        /// URL that was requested.
        url: String,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No access token configured for the geocoding service.
    #[error("no geocoding access token (set geocoding.access_token or MAPBOX_ACCESS_TOKEN)")]
    GeocoderTokenMissing,

    /// Reverse-geocoding request failed.
    #[error("reverse geocoding request failed: {source}")]
    GeocodeRequest {
        /// Underlying HTTP error.
        #[source]
        source: reqwest::Error,
    },

    /// Reverse-geocoding service returned a non-success status.
    #[error("reverse geocoding failed with HTTP {status}")]
    GeocodeStatus {
        /// HTTP status code returned by the service.
        status: u16,
    },

    /// Reverse-geocoding response body could not be decoded.
    #[error("invalid reverse geocoding response: {reason}")]
    GeocodeDecode {
        /// Description of the decoding failure.
        reason: String,
    },

    /// Failed to write output.
    #[error("failed to write output: {reason}")]
    Output {
        /// Description of the write failure.
        reason: String,
    },

    /// Internal error (unexpected state).
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}
