//! Spatial analysis: point projection, density clustering, aggregation.

mod aggregate;
mod dbscan;
mod geometry;

pub use aggregate::{Cluster, aggregate};
pub use dbscan::{ClusterAssignment, ClusterError, ClusterParams, cluster, distance_km, try_cluster};
pub use geometry::{PointFeature, to_point_features};

/// Run the full pass: project, cluster, aggregate.
///
/// Unlike [`cluster`], a clustering failure is returned so callers can
/// tell "no clusters" apart from "clustering did not run".
pub fn build_clusters<'a, I>(readings: I, params: &ClusterParams) -> Result<Vec<Cluster>, ClusterError>
where
    I: IntoIterator<Item = &'a crate::sensor::SensorReading>,
{
    let points = to_point_features(readings);
    let assignments = try_cluster(&points, params)?;
    Ok(aggregate(&points, &assignments))
}
