//! Projection of sensor readings into point features.

use crate::sensor::SensorReading;
use geo::Point;

/// A sensor reading placed at its `(lon, lat)` position.
#[derive(Debug, Clone, PartialEq)]
pub struct PointFeature {
    /// Position with x = longitude, y = latitude.
    pub geometry: Point<f64>,
    /// The full reading the point was built from.
    pub properties: SensorReading,
}

impl PointFeature {
    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.geometry.x()
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.geometry.y()
    }

    /// Identifier of the module this point represents.
    pub fn module_id(&self) -> &str {
        &self.properties.module_id
    }
}

/// Build point features for every reading with usable coordinates.
///
/// Readings without both a finite longitude and latitude are skipped;
/// the remaining order matches the input order.
pub fn to_point_features<'a, I>(readings: I) -> Vec<PointFeature>
where
    I: IntoIterator<Item = &'a SensorReading>,
{
    readings
        .into_iter()
        .filter_map(|reading| {
            reading.coordinates().map(|(lon, lat)| PointFeature {
                geometry: Point::new(lon, lat),
                properties: reading.clone(),
            })
        })
        .collect()
}
