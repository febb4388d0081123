//! Cluster label enrichment via reverse geocoding.

mod enricher;
mod geocoder;
mod store;

pub use enricher::LabelEnricher;
pub use geocoder::{Geocoder, MapboxGeocoder, parse_place_name};
pub use store::{LabelState, LabelStatus, LabelStore};
