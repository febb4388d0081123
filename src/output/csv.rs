//! CSV output format writer.

use crate::constants::COORD_DECIMAL_PLACES;
use crate::error::{Error, Result};
use crate::monitor::ClusterDetails;
use crate::output::OutputWriter;
use std::io::Write;

/// Column names, in order.
const HEADER: [&str; 7] = [
    "cluster_id",
    "lon",
    "lat",
    "point_count",
    "label",
    "label_error",
    "members",
];

/// CSV format output writer. One row per cluster; members joined with `;`.
pub struct CsvWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvWriter<W> {
    /// Create a new CSV writer.
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new()
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(inner),
        }
    }

    /// Consume the writer and return the underlying sink.
    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|e| Error::Output {
            reason: e.to_string(),
        })
    }
}

fn csv_error(e: csv::Error) -> Error {
    Error::Output {
        reason: e.to_string(),
    }
}

impl<W: Write> OutputWriter for CsvWriter<W> {
    fn write_header(&mut self) -> Result<()> {
        self.writer.write_record(HEADER).map_err(csv_error)
    }

    fn write_cluster(&mut self, cluster: &ClusterDetails) -> Result<()> {
        let [lon, lat] = cluster.centroid;
        let label = if cluster.label.is_loading_label {
            String::new()
        } else {
            cluster.label.label.clone()
        };
        self.writer
            .write_record([
                cluster.id.to_string(),
                format!("{lon:.prec$}", prec = COORD_DECIMAL_PLACES),
                format!("{lat:.prec$}", prec = COORD_DECIMAL_PLACES),
                cluster.point_count.to_string(),
                label,
                cluster.label.label_error.clone().unwrap_or_default(),
                cluster.members.join(";"),
            ])
            .map_err(csv_error)
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::labels::LabelState;
    use crate::output::write_all;

    #[test]
    fn test_csv_writer_rows() {
        let clusters = vec![ClusterDetails {
            id: 0,
            centroid: [-71.09025, 42.34025],
            point_count: 2,
            members: vec!["a".to_string(), "b".to_string()],
            label: LabelState::resolved(Some("Boston, Massachusetts".to_string())),
        }];

        let mut writer = CsvWriter::new(Vec::new());
        write_all(&mut writer, &clusters).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("cluster_id,lon,lat,point_count,label,label_error,members")
        );
        assert_eq!(
            lines.next(),
            Some("0,-71.090250,42.340250,2,\"Boston, Massachusetts\",,a;b")
        );
    }

    #[test]
    fn test_csv_pending_label_left_empty() {
        let clusters = vec![ClusterDetails {
            id: 1,
            centroid: [0.0, 0.0],
            point_count: 1,
            members: vec!["solo".to_string()],
            label: LabelState::pending(),
        }];

        let mut writer = CsvWriter::new(Vec::new());
        write_all(&mut writer, &clusters).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        assert_eq!(text.lines().nth(1), Some("1,0.000000,0.000000,1,,,solo"));
    }
}
