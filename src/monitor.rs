//! Sensor monitor: explicit state for clusters, labels and selection.
//!
//! Owns the current snapshot and location filter, recomputes clusters
//! whenever either changes, and hands out label state and navigation
//! answers to consumers.

use crate::labels::{LabelEnricher, LabelState, LabelStore};
use crate::navigation;
use crate::sensor::{LocationFilter, SensorReading};
use crate::spatial::{Cluster, ClusterParams, build_clusters};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Consumer view of one cluster together with its current label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterDetails {
    /// Cluster id within the current run.
    pub id: usize,
    /// Centroid as `[lon, lat]`.
    pub centroid: [f64; 2],
    /// Number of member sensors.
    pub point_count: usize,
    /// Member module ids in scan order.
    pub members: Vec<String>,
    /// Label enrichment state.
    #[serde(flatten)]
    pub label: LabelState,
}

/// Counts describing the current clustering run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonitorSummary {
    /// Sensors in the snapshot.
    pub sensors: usize,
    /// Sensors admitted by the location filter.
    pub filtered: usize,
    /// Admitted sensors with usable coordinates.
    pub located: usize,
    /// Sensors assigned to a cluster.
    pub clustered: usize,
    /// Located sensors left out as noise. Zero when clustering failed.
    pub noise: usize,
    /// Number of clusters.
    pub clusters: usize,
    /// Whether the last clustering pass failed and produced no clusters.
    pub clustering_failed: bool,
}

/// State object for the clustering and navigation subsystem.
pub struct SensorMonitor {
    params: ClusterParams,
    sensors: Vec<SensorReading>,
    filter: LocationFilter,
    clusters: Vec<Cluster>,
    labels: LabelStore,
    enricher: Option<LabelEnricher>,
    selected_sensor_id: Option<String>,
    clustering_failed: bool,
}

impl SensorMonitor {
    /// Create an empty monitor without label enrichment.
    pub fn new(params: ClusterParams) -> Self {
        Self {
            params,
            sensors: Vec::new(),
            filter: LocationFilter::All,
            clusters: Vec::new(),
            labels: LabelStore::new(),
            enricher: None,
            selected_sensor_id: None,
            clustering_failed: false,
        }
    }

    /// Create an empty monitor whose recomputes launch label lookups.
    pub fn with_enricher(params: ClusterParams, enricher: LabelEnricher) -> Self {
        let mut monitor = Self::new(params);
        monitor.labels = enricher.store().clone();
        monitor.enricher = Some(enricher);
        monitor
    }

    /// Replace the snapshot and recompute.
    pub fn set_sensors(&mut self, sensors: Vec<SensorReading>) -> Vec<JoinHandle<()>> {
        self.sensors = sensors;
        self.recompute()
    }

    /// Replace the location filter and recompute.
    pub fn set_location_filter(&mut self, filter: LocationFilter) -> Vec<JoinHandle<()>> {
        self.filter = filter;
        self.recompute()
    }

    /// Replace the clustering parameters and recompute.
    pub fn set_params(&mut self, params: ClusterParams) -> Vec<JoinHandle<()>> {
        self.params = params;
        self.recompute()
    }

    /// Rebuild clusters from the snapshot and reset labels to a new epoch.
    ///
    /// With an enricher attached, one lookup is launched per cluster and
    /// the handles are returned; callers may drop them.
    pub fn recompute(&mut self) -> Vec<JoinHandle<()>> {
        let admitted = self.filter.apply(&self.sensors);
        match build_clusters(admitted, &self.params) {
            Ok(clusters) => {
                self.clusters = clusters;
                self.clustering_failed = false;
            }
            Err(e) => {
                error!("Clustering failed, continuing without clusters: {e}");
                self.clusters = Vec::new();
                self.clustering_failed = true;
            }
        }

        let epoch = self.labels.reset(self.clusters.iter().map(|c| c.id));
        debug!(
            "Recomputed {} cluster(s) from {} sensor(s), label epoch {epoch}",
            self.clusters.len(),
            self.sensors.len()
        );

        match &self.enricher {
            Some(enricher) => enricher.enrich_all(&self.clusters),
            None => Vec::new(),
        }
    }

    /// Clusters of the current run.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Current snapshot.
    pub fn sensors(&self) -> &[SensorReading] {
        &self.sensors
    }

    /// Active location filter.
    pub fn location_filter(&self) -> &LocationFilter {
        &self.filter
    }

    /// Clustering parameters.
    pub fn params(&self) -> &ClusterParams {
        &self.params
    }

    /// Label store of the current run.
    pub fn labels(&self) -> &LabelStore {
        &self.labels
    }

    /// Current label epoch.
    pub fn epoch(&self) -> u64 {
        self.labels.epoch()
    }

    /// Every cluster with its current label state, in id order.
    pub fn cluster_details_with_labels(&self) -> Vec<ClusterDetails> {
        let labels = self.labels.snapshot();
        self.clusters
            .iter()
            .map(|cluster| ClusterDetails {
                id: cluster.id,
                centroid: [cluster.centroid.x(), cluster.centroid.y()],
                point_count: cluster.point_count(),
                members: cluster
                    .members
                    .iter()
                    .map(|m| m.module_id().to_string())
                    .collect(),
                label: labels
                    .get(&cluster.id)
                    .cloned()
                    .unwrap_or_else(LabelState::pending),
            })
            .collect()
    }

    /// Counts for the current run.
    pub fn summary(&self) -> MonitorSummary {
        let admitted = self.filter.apply(&self.sensors);
        let located = admitted.iter().filter(|r| r.coordinates().is_some()).count();
        let clustered = self.clusters.iter().map(Cluster::point_count).sum();
        MonitorSummary {
            sensors: self.sensors.len(),
            filtered: admitted.len(),
            located,
            clustered,
            noise: if self.clustering_failed {
                0
            } else {
                located.saturating_sub(clustered)
            },
            clusters: self.clusters.len(),
            clustering_failed: self.clustering_failed,
        }
    }

    /// Select a sensor by id.
    pub fn select_sensor(&mut self, module_id: impl Into<String>) {
        self.selected_sensor_id = Some(module_id.into());
    }

    /// Id of the selected sensor.
    pub fn selected_sensor_id(&self) -> Option<&str> {
        self.selected_sensor_id.as_deref()
    }

    /// The selected sensor's reading, if it is in the snapshot.
    pub fn selected_sensor(&self) -> Option<&SensorReading> {
        let id = self.selected_sensor_id.as_deref()?;
        self.sensors.iter().find(|s| s.module_id == id)
    }

    /// Next sensor after the selection within its cluster.
    pub fn next_sensor_id(&self) -> Option<String> {
        navigation::next(self.selected_sensor_id.as_deref()?, &self.clusters)
    }

    /// Previous sensor before the selection within its cluster.
    pub fn previous_sensor_id(&self) -> Option<String> {
        navigation::previous(self.selected_sensor_id.as_deref()?, &self.clusters)
    }

    /// Move the selection forward. Leaves it unchanged when navigation is impossible.
    pub fn select_next_sensor(&mut self) -> Option<&str> {
        let next = self.next_sensor_id()?;
        info!("Selected next sensor {next}");
        self.selected_sensor_id = Some(next);
        self.selected_sensor_id()
    }

    /// Move the selection backward. Leaves it unchanged when navigation is impossible.
    pub fn select_previous_sensor(&mut self) -> Option<&str> {
        let previous = self.previous_sensor_id()?;
        info!("Selected previous sensor {previous}");
        self.selected_sensor_id = Some(previous);
        self.selected_sensor_id()
    }
}
