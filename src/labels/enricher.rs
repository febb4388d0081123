//! Fire-and-forget label lookups for cluster centroids.

use super::{Geocoder, LabelState, LabelStore};
use crate::spatial::Cluster;
use geo::Point;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Launches one independent reverse-geocoding task per cluster.
///
/// Each task captures the store epoch at launch and writes only its own
/// cluster's entry, and only if the epoch has not moved on.
#[derive(Clone)]
pub struct LabelEnricher {
    geocoder: Arc<dyn Geocoder>,
    store: LabelStore,
}

impl LabelEnricher {
    /// Create an enricher writing into `store`.
    pub fn new(geocoder: Arc<dyn Geocoder>, store: LabelStore) -> Self {
        Self { geocoder, store }
    }

    /// The store this enricher writes into.
    pub fn store(&self) -> &LabelStore {
        &self.store
    }

    /// Start a lookup for one cluster.
    ///
    /// The cluster must already be pending in the store; otherwise nothing
    /// is launched and `None` is returned. Outside a tokio runtime the
    /// lookup is skipped, the entry stays pending and `None` is returned.
    pub fn enrich_label(&self, cluster_id: usize, centroid: Point<f64>) -> Option<JoinHandle<()>> {
        let Some(epoch) = self.store.epoch_if_present(cluster_id) else {
            warn!("Label requested for unknown cluster {cluster_id}, ignoring");
            return None;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime, skipping label lookup for cluster {cluster_id}");
            return None;
        };

        let geocoder = Arc::clone(&self.geocoder);
        let store = self.store.clone();
        let (lon, lat) = (centroid.x(), centroid.y());

        Some(runtime.spawn(async move {
            let state = match geocoder.reverse_geocode(lon, lat).await {
                Ok(place) => LabelState::resolved(place),
                Err(e) => {
                    warn!("Label lookup for cluster {cluster_id} at ({lon:.5}, {lat:.5}) failed: {e}");
                    LabelState::failed(e.to_string())
                }
            };

            if store.apply(cluster_id, epoch, state) {
                debug!("Cluster {cluster_id} label resolved (epoch {epoch})");
            } else {
                debug!("Discarding stale label for cluster {cluster_id} from epoch {epoch}");
            }
        }))
    }

    /// Start lookups for every cluster.
    pub fn enrich_all(&self, clusters: &[Cluster]) -> Vec<JoinHandle<()>> {
        clusters
            .iter()
            .filter_map(|c| self.enrich_label(c.id, c.centroid))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::labels::LabelStatus;
    use futures_util::future::{BoxFuture, join_all};
    use std::time::Duration;

    /// Answers by longitude: <0 fails, 0 finds nothing, >0 finds a place.
    /// Latitude is used as a delay in milliseconds.
    struct FakeGeocoder;

    impl Geocoder for FakeGeocoder {
        fn reverse_geocode(&self, lon: f64, lat: f64) -> BoxFuture<'_, Result<Option<String>>> {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(lat as u64)).await;
                if lon < 0.0 {
                    Err(Error::GeocodeStatus { status: 503 })
                } else if lon == 0.0 {
                    Ok(None)
                } else {
                    Ok(Some(format!("Place {lon}")))
                }
            })
        }
    }

    fn enricher() -> LabelEnricher {
        LabelEnricher::new(Arc::new(FakeGeocoder), LabelStore::new())
    }

    #[tokio::test]
    async fn test_resolves_place_name() {
        let enricher = enricher();
        enricher.store().reset([0]);

        enricher.enrich_label(0, Point::new(1.0, 0.0)).unwrap().await.unwrap();

        let state = enricher.store().get(0).unwrap();
        assert_eq!(state.label, "Place 1");
        assert_eq!(state.status(), LabelStatus::Resolved);
    }

    #[tokio::test]
    async fn test_zero_results_use_fallback() {
        let enricher = enricher();
        enricher.store().reset([0]);

        enricher.enrich_label(0, Point::new(0.0, 0.0)).unwrap().await.unwrap();

        let state = enricher.store().get(0).unwrap();
        assert_eq!(state.label, "Nearby Location");
        assert!(!state.is_loading_label);
        assert_eq!(state.label_error, None);
    }

    #[tokio::test]
    async fn test_failure_records_error() {
        let enricher = enricher();
        enricher.store().reset([0]);

        enricher.enrich_label(0, Point::new(-1.0, 0.0)).unwrap().await.unwrap();

        let state = enricher.store().get(0).unwrap();
        assert_eq!(state.label, "Error fetching label");
        assert!(!state.is_loading_label);
        assert_eq!(
            state.label_error.as_deref(),
            Some("reverse geocoding failed with HTTP 503")
        );
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_others() {
        let enricher = enricher();
        enricher.store().reset([0, 1, 2]);

        let handles = vec![
            enricher.enrich_label(0, Point::new(-1.0, 5.0)).unwrap(),
            enricher.enrich_label(1, Point::new(2.0, 20.0)).unwrap(),
            enricher.enrich_label(2, Point::new(0.0, 1.0)).unwrap(),
        ];
        join_all(handles).await;

        let labels = enricher.store().snapshot();
        assert_eq!(labels[&0].status(), LabelStatus::Failed);
        assert_eq!(labels[&1].label, "Place 2");
        assert_eq!(labels[&2].label, "Nearby Location");
        assert!(!enricher.store().is_loading());
    }

    #[tokio::test]
    async fn test_unknown_cluster_is_noop() {
        let enricher = enricher();
        enricher.store().reset([0]);

        assert!(enricher.enrich_label(9, Point::new(1.0, 0.0)).is_none());
        assert_eq!(enricher.store().get(9), None);
    }

    #[test]
    fn test_no_runtime_leaves_label_pending() {
        let enricher = enricher();
        enricher.store().reset([0]);

        assert!(enricher.enrich_label(0, Point::new(1.0, 0.0)).is_none());
        assert_eq!(enricher.store().get(0).unwrap(), LabelState::pending());
    }

    #[tokio::test]
    async fn test_result_after_reset_is_discarded() {
        let enricher = enricher();
        enricher.store().reset([0]);

        let handle = enricher.enrich_label(0, Point::new(1.0, 30.0)).unwrap();
        enricher.store().reset([0]);
        handle.await.unwrap();

        assert_eq!(enricher.store().get(0).unwrap(), LabelState::pending());
    }
}
