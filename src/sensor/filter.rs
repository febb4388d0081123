//! Location filter applied before clustering.

use super::SensorReading;
use std::collections::BTreeSet;

/// Which sensors participate in clustering, by location name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LocationFilter {
    /// Every sensor participates.
    #[default]
    All,
    /// Only sensors whose location is in the list participate.
    ///
    /// An empty list admits nothing.
    Only(Vec<String>),
}

impl LocationFilter {
    /// Build a filter from an optional list of names.
    pub fn from_names(names: Option<Vec<String>>) -> Self {
        names.map_or(Self::All, Self::Only)
    }

    /// Whether the reading passes the filter.
    pub fn admits(&self, reading: &SensorReading) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => reading
                .location
                .as_deref()
                .is_some_and(|loc| names.iter().any(|n| n == loc)),
        }
    }

    /// Readings that pass the filter, in input order.
    pub fn apply<'a>(&self, readings: &'a [SensorReading]) -> Vec<&'a SensorReading> {
        readings.iter().filter(|r| self.admits(r)).collect()
    }
}

/// Distinct location names in the snapshot, sorted.
pub fn available_locations(readings: &[SensorReading]) -> Vec<String> {
    readings
        .iter()
        .filter_map(|r| r.location.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings() -> Vec<SensorReading> {
        vec![
            SensorReading::new("a", Some(0.0), Some(0.0)).with_location("Cabot Center"),
            SensorReading::new("b", Some(0.0), Some(0.0)).with_location("Matthews Arena"),
            SensorReading::new("c", Some(0.0), Some(0.0)),
            SensorReading::new("d", Some(0.0), Some(0.0)).with_location("Cabot Center"),
        ]
    }

    #[test]
    fn test_all_admits_everything() {
        assert_eq!(LocationFilter::All.apply(&readings()).len(), 4);
    }

    #[test]
    fn test_only_admits_listed_locations() {
        let readings = readings();
        let filter = LocationFilter::Only(vec!["Cabot Center".to_string()]);
        let ids: Vec<_> = filter
            .apply(&readings)
            .iter()
            .map(|r| r.module_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[test]
    fn test_empty_list_admits_nothing() {
        let filter = LocationFilter::from_names(Some(vec![]));
        assert!(filter.apply(&readings()).is_empty());
    }

    #[test]
    fn test_available_locations_sorted_and_distinct() {
        assert_eq!(
            available_locations(&readings()),
            vec!["Cabot Center".to_string(), "Matthews Arena".to_string()]
        );
    }
}
