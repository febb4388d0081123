//! Next/previous navigation among sensors of the same cluster.
//!
//! Siblings are ordered by latitude ascending, then by module id, then
//! by scan order. Stepping past either end wraps around.

use crate::sensor::SensorReading;
use crate::spatial::Cluster;
use std::cmp::Ordering;

/// Siblings of a selected sensor and its position among them.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationContext<'a> {
    /// Cluster members in navigation order.
    pub siblings: Vec<&'a SensorReading>,
    /// Index of the selected sensor in `siblings`.
    pub index: usize,
}

impl NavigationContext<'_> {
    /// Module id after the selected one, wrapping to the first.
    pub fn next_id(&self) -> &str {
        let next = (self.index + 1) % self.siblings.len();
        &self.siblings[next].module_id
    }

    /// Module id before the selected one, wrapping to the last.
    pub fn previous_id(&self) -> &str {
        let len = self.siblings.len();
        let previous = (self.index + len - 1) % len;
        &self.siblings[previous].module_id
    }
}

/// Members of the cluster containing `selected_id`, in navigation order.
///
/// Empty when the sensor is unclustered or unknown.
pub fn siblings_of<'a>(selected_id: &str, clusters: &'a [Cluster]) -> Vec<&'a SensorReading> {
    let Some(cluster) = clusters.iter().find(|c| c.contains(selected_id)) else {
        return Vec::new();
    };

    let mut siblings: Vec<(f64, &SensorReading)> = cluster
        .members
        .iter()
        .map(|m| (m.lat(), &m.properties))
        .collect();
    // Stable sort keeps scan order for full ties.
    siblings.sort_by(|(lat_a, a), (lat_b, b)| {
        lat_a
            .partial_cmp(lat_b)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.module_id.cmp(&b.module_id))
    });
    siblings.into_iter().map(|(_, reading)| reading).collect()
}

/// Navigation context for the selected sensor, if it is clustered.
pub fn context<'a>(selected_id: &str, clusters: &'a [Cluster]) -> Option<NavigationContext<'a>> {
    let siblings = siblings_of(selected_id, clusters);
    let index = siblings.iter().position(|s| s.module_id == selected_id)?;
    Some(NavigationContext { siblings, index })
}

/// Module id of the next sensor in the selected sensor's cluster.
pub fn next(selected_id: &str, clusters: &[Cluster]) -> Option<String> {
    context(selected_id, clusters).map(|ctx| ctx.next_id().to_string())
}

/// Module id of the previous sensor in the selected sensor's cluster.
pub fn previous(selected_id: &str, clusters: &[Cluster]) -> Option<String> {
    context(selected_id, clusters).map(|ctx| ctx.previous_id().to_string())
}
