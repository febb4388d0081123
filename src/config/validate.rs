//! Configuration validation.

use crate::config::Config;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_clustering(config)?;
    validate_geocoding(config)?;
    Ok(())
}

fn validate_clustering(config: &Config) -> Result<()> {
    let clustering = &config.clustering;

    if !clustering.max_distance_km.is_finite() || clustering.max_distance_km < 0.0 {
        return Err(Error::ConfigValidation {
            message: format!(
                "clustering.max_distance_km must be a non-negative number, got {}",
                clustering.max_distance_km
            ),
        });
    }

    if clustering.min_points == 0 {
        return Err(Error::ConfigValidation {
            message: "clustering.min_points must be at least 1".to_string(),
        });
    }

    Ok(())
}

fn validate_geocoding(config: &Config) -> Result<()> {
    let geocoding = &config.geocoding;

    if geocoding.endpoint.trim().is_empty() {
        return Err(Error::ConfigValidation {
            message: "geocoding.endpoint must not be empty".to_string(),
        });
    }

    if geocoding.timeout_secs == 0 {
        return Err(Error::ConfigValidation {
            message: "geocoding.timeout_secs must be at least 1".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_negative_radius() {
        let mut config = Config::default();
        config.clustering.max_distance_km = -0.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_nan_radius() {
        let mut config = Config::default();
        config.clustering.max_distance_km = f64::NAN;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_min_points() {
        let mut config = Config::default();
        config.clustering.min_points = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.geocoding.timeout_secs = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_validate_blank_endpoint() {
        let mut config = Config::default();
        config.geocoding.endpoint = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }
}
