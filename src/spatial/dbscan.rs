//! Density-based clustering (DBSCAN) over great-circle distance.
//!
//! The neighbourhood of a point is every point, itself included, within
//! `max_distance_km`. A point whose neighbourhood holds at least
//! `min_points` points is a core point. Clusters grow outward from core
//! points; non-core points reached from a cluster become border points
//! of the first cluster that reaches them, and the rest are noise.
//!
//! Cluster ids are numbered from 0 in the order their first core point
//! appears in the input. They carry no meaning across runs.

use super::PointFeature;
use geo::{Distance, Haversine};
use std::collections::VecDeque;
use tracing::{debug, error};

/// DBSCAN parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterParams {
    /// Neighbourhood radius in kilometres.
    pub max_distance_km: f64,
    /// Minimum neighbourhood size, including the point itself, for a core point.
    pub min_points: usize,
}

/// Outcome of clustering for a single point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterAssignment {
    /// Member of the cluster with this id.
    Cluster(usize),
    /// Not dense enough to belong to any cluster.
    Noise,
}

impl ClusterAssignment {
    /// Cluster id, or `None` for noise.
    pub fn cluster_id(self) -> Option<usize> {
        match self {
            Self::Cluster(id) => Some(id),
            Self::Noise => None,
        }
    }
}

/// Reasons a clustering pass cannot run.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ClusterError {
    /// Radius is negative, NaN or infinite.
    #[error("invalid clustering radius: {0} km")]
    InvalidRadius(f64),
    /// `min_points` is zero.
    #[error("min_points must be at least 1")]
    InvalidMinPoints,
    /// A point has a non-finite coordinate.
    #[error("point {index} ({module_id}) has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Position of the point in the input.
        index: usize,
        /// Module the point belongs to.
        module_id: String,
    },
    /// A pairwise distance came out non-finite.
    #[error("distance between points {a} and {b} is not finite")]
    NonFiniteDistance {
        /// First point index.
        a: usize,
        /// Second point index.
        b: usize,
    },
}

/// Cluster points, degrading to an empty result on failure.
///
/// Failures are logged; sensor rendering continues without clusters.
pub fn cluster(points: &[PointFeature], params: &ClusterParams) -> Vec<ClusterAssignment> {
    match try_cluster(points, params) {
        Ok(assignments) => assignments,
        Err(e) => {
            error!("Clustering failed, continuing without clusters: {e}");
            Vec::new()
        }
    }
}

/// Cluster points, returning one assignment per point in input order.
pub fn try_cluster(
    points: &[PointFeature],
    params: &ClusterParams,
) -> Result<Vec<ClusterAssignment>, ClusterError> {
    if !params.max_distance_km.is_finite() || params.max_distance_km < 0.0 {
        return Err(ClusterError::InvalidRadius(params.max_distance_km));
    }
    if params.min_points == 0 {
        return Err(ClusterError::InvalidMinPoints);
    }
    if let Some((index, point)) = points
        .iter()
        .enumerate()
        .find(|(_, p)| !p.lon().is_finite() || !p.lat().is_finite())
    {
        return Err(ClusterError::NonFiniteCoordinate {
            index,
            module_id: point.module_id().to_string(),
        });
    }

    let neighbours = neighbourhoods(points, params.max_distance_km)?;
    let is_core = |i: usize| neighbours[i].len() >= params.min_points;

    let mut labels: Vec<Option<ClusterAssignment>> = vec![None; points.len()];
    let mut next_id = 0;

    for seed in 0..points.len() {
        if labels[seed].is_some() {
            continue;
        }
        if !is_core(seed) {
            labels[seed] = Some(ClusterAssignment::Noise);
            continue;
        }

        let id = next_id;
        next_id += 1;
        labels[seed] = Some(ClusterAssignment::Cluster(id));

        let mut queue: VecDeque<usize> = neighbours[seed].iter().copied().collect();
        while let Some(j) = queue.pop_front() {
            match labels[j] {
                Some(ClusterAssignment::Cluster(_)) => {}
                // Noise reached from a core point becomes a border point.
                Some(ClusterAssignment::Noise) => labels[j] = Some(ClusterAssignment::Cluster(id)),
                None => {
                    labels[j] = Some(ClusterAssignment::Cluster(id));
                    if is_core(j) {
                        queue.extend(neighbours[j].iter().copied());
                    }
                }
            }
        }
    }

    let assignments = drop_undersized(labels, next_id, params.min_points);

    debug!(
        "DBSCAN over {} point(s) with radius {} km, min_points {}: {} cluster(s)",
        points.len(),
        params.max_distance_km,
        params.min_points,
        assignments
            .iter()
            .filter_map(|a| a.cluster_id())
            .max()
            .map_or(0, |id| id + 1)
    );

    Ok(assignments)
}

/// Demote groups smaller than `min_points` to noise and renumber the rest densely.
///
/// A core point whose neighbours were all claimed as border points of
/// earlier clusters would otherwise found an undersized cluster.
fn drop_undersized(
    labels: Vec<Option<ClusterAssignment>>,
    cluster_count: usize,
    min_points: usize,
) -> Vec<ClusterAssignment> {
    let mut sizes = vec![0_usize; cluster_count];
    for id in labels.iter().flatten().filter_map(|a| a.cluster_id()) {
        sizes[id] += 1;
    }

    // Ids follow seed order, so ascending ids keep first-core-point order.
    let mut remap = vec![None; cluster_count];
    let mut next_id = 0;
    for (id, size) in sizes.into_iter().enumerate() {
        if size >= min_points {
            remap[id] = Some(next_id);
            next_id += 1;
        } else {
            debug!("Demoting cluster {id} with {size} member(s) to noise");
        }
    }

    labels
        .into_iter()
        .map(|label| {
            label
                .and_then(ClusterAssignment::cluster_id)
                .and_then(|id| remap[id])
                .map_or(ClusterAssignment::Noise, ClusterAssignment::Cluster)
        })
        .collect()
}

/// Great-circle distance between two features in kilometres.
pub fn distance_km(a: &PointFeature, b: &PointFeature) -> f64 {
    Haversine::distance(a.geometry, b.geometry) / 1000.0
}

/// Indices of all points within `radius_km` of each point, itself included.
fn neighbourhoods(points: &[PointFeature], radius_km: f64) -> Result<Vec<Vec<usize>>, ClusterError> {
    let mut neighbours: Vec<Vec<usize>> = (0..points.len()).map(|i| vec![i]).collect();

    for a in 0..points.len() {
        for b in (a + 1)..points.len() {
            let d = distance_km(&points[a], &points[b]);
            if !d.is_finite() {
                return Err(ClusterError::NonFiniteDistance { a, b });
            }
            if d <= radius_km {
                neighbours[a].push(b);
                neighbours[b].push(a);
            }
        }
    }

    Ok(neighbours)
}
