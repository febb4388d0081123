//! Output type definitions.

use crate::monitor::MonitorSummary;
use crate::spatial::ClusterParams;
use serde::Serialize;

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Human-readable table.
    #[default]
    Table,
    /// Pretty-printed JSON report.
    Json,
    /// One CSV row per cluster.
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Run settings recorded alongside results.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RunSettings {
    /// Neighbourhood radius in kilometres.
    pub max_distance_km: f64,
    /// Minimum neighbourhood size.
    pub min_points: usize,
    /// Whether labels were looked up.
    pub labels: bool,
}

impl RunSettings {
    /// Settings for a run with the given parameters.
    pub fn new(params: &ClusterParams, labels: bool) -> Self {
        Self {
            max_distance_km: params.max_distance_km,
            min_points: params.min_points,
            labels,
        }
    }
}

/// Context passed to writers that record more than the clusters.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext {
    /// Run settings.
    pub settings: RunSettings,
    /// Run counts.
    pub summary: MonitorSummary,
}
