//! JSON output format writer.

use crate::error::{Error, Result};
use crate::monitor::{ClusterDetails, MonitorSummary};
use crate::output::{OutputWriter, ReportContext, RunSettings};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Clustering settings.
    pub settings: RunSettings,
    /// Run counts.
    pub summary: MonitorSummary,
    /// Clusters with labels.
    pub clusters: &'a [ClusterDetails],
}

/// Writer collecting clusters and emitting one JSON document at finalize.
pub struct JsonWriter<W: Write> {
    inner: W,
    context: ReportContext,
    clusters: Vec<ClusterDetails>,
}

impl<W: Write> JsonWriter<W> {
    /// Create a new JSON writer.
    pub fn new(inner: W, context: ReportContext) -> Self {
        Self {
            inner,
            context,
            clusters: Vec::new(),
        }
    }

    /// Consume the writer and return the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_header(&mut self) -> Result<()> {
        // Everything is written at finalize
        Ok(())
    }

    fn write_cluster(&mut self, cluster: &ClusterDetails) -> Result<()> {
        self.clusters.push(cluster.clone());
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        let report = JsonReport {
            generated_at: Utc::now(),
            settings: self.context.settings,
            summary: self.context.summary,
            clusters: &self.clusters,
        };
        serde_json::to_writer_pretty(&mut self.inner, &report).map_err(|e| Error::Output {
            reason: e.to_string(),
        })?;
        writeln!(self.inner)?;
        self.inner.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::labels::LabelState;
    use crate::output::write_all;

    fn context() -> ReportContext {
        ReportContext {
            settings: RunSettings {
                max_distance_km: 0.5,
                min_points: 1,
                labels: true,
            },
            summary: MonitorSummary {
                sensors: 3,
                filtered: 3,
                located: 2,
                clustered: 2,
                noise: 0,
                clusters: 1,
                clustering_failed: false,
            },
        }
    }

    #[test]
    fn test_json_report_shape() {
        let clusters = vec![ClusterDetails {
            id: 4,
            centroid: [1.5, 2.5],
            point_count: 2,
            members: vec!["a".to_string(), "b".to_string()],
            label: LabelState::failed("timeout"),
        }];

        let mut writer = JsonWriter::new(Vec::new(), context());
        write_all(&mut writer, &clusters).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&writer.into_inner()).unwrap();

        assert_eq!(value["settings"]["max_distance_km"], 0.5);
        assert_eq!(value["summary"]["located"], 2);
        let cluster = &value["clusters"][0];
        assert_eq!(cluster["id"], 4);
        assert_eq!(cluster["centroid"][0], 1.5);
        assert_eq!(cluster["label"], "Error fetching label");
        assert_eq!(cluster["is_loading_label"], false);
        assert_eq!(cluster["label_error"], "timeout");
    }
}
