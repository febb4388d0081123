//! Grouping clustered points into per-cluster summaries.

use super::{ClusterAssignment, PointFeature};
use geo::{Centroid, MultiPoint, Point};
use std::collections::BTreeMap;
use tracing::warn;

/// One cluster from a single clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Cluster id assigned by the clustering pass. Only meaningful within that run.
    pub id: usize,
    /// Centre of mass of the members, x = longitude, y = latitude.
    pub centroid: Point<f64>,
    /// Member points in scan order.
    pub members: Vec<PointFeature>,
}

impl Cluster {
    /// Number of member points.
    pub fn point_count(&self) -> usize {
        self.members.len()
    }

    /// Whether the module is a member of this cluster.
    pub fn contains(&self, module_id: &str) -> bool {
        self.members.iter().any(|m| m.module_id() == module_id)
    }
}

/// Group points by assigned cluster, dropping noise.
///
/// Clusters are returned in ascending id order. Points and assignments
/// are matched by position; if the lengths differ only the common prefix
/// is used.
pub fn aggregate(points: &[PointFeature], assignments: &[ClusterAssignment]) -> Vec<Cluster> {
    if points.len() != assignments.len() {
        warn!(
            "Point/assignment length mismatch ({} vs {}), aggregating common prefix",
            points.len(),
            assignments.len()
        );
    }

    let mut groups: BTreeMap<usize, Vec<PointFeature>> = BTreeMap::new();
    for (point, assignment) in points.iter().zip(assignments) {
        if let Some(id) = assignment.cluster_id() {
            groups.entry(id).or_default().push(point.clone());
        }
    }

    groups
        .into_iter()
        .filter_map(|(id, members)| {
            let centroid = center_of_mass(&members)?;
            Some(Cluster {
                id,
                centroid,
                members,
            })
        })
        .collect()
}

/// Average position of the points.
fn center_of_mass(members: &[PointFeature]) -> Option<Point<f64>> {
    MultiPoint::from(members.iter().map(|m| m.geometry).collect::<Vec<_>>()).centroid()
}
