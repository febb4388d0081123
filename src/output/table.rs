//! Plain text table writer.

use crate::constants::COORD_DECIMAL_PLACES;
use crate::error::Result;
use crate::monitor::ClusterDetails;
use crate::output::OutputWriter;
use std::io::Write;

/// Human-readable cluster table.
pub struct TableWriter<W: Write> {
    inner: W,
    rows: usize,
}

impl<W: Write> TableWriter<W> {
    /// Create a new table writer.
    pub fn new(inner: W) -> Self {
        Self { inner, rows: 0 }
    }

    /// Consume the writer and return the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> OutputWriter for TableWriter<W> {
    fn write_header(&mut self) -> Result<()> {
        writeln!(
            self.inner,
            "{:>4}  {:>11}  {:>10}  {:>5}  {:<32}  Members",
            "ID", "Lon", "Lat", "Count", "Label"
        )?;
        Ok(())
    }

    fn write_cluster(&mut self, cluster: &ClusterDetails) -> Result<()> {
        let [lon, lat] = cluster.centroid;
        // Pending only when no lookup was run
        let label = if cluster.label.is_loading_label {
            "-"
        } else {
            cluster.label.label.as_str()
        };
        writeln!(
            self.inner,
            "{:>4}  {:>11.prec$}  {:>10.prec$}  {:>5}  {:<32}  {}",
            cluster.id,
            lon,
            lat,
            cluster.point_count,
            label,
            cluster.members.join(", "),
            prec = COORD_DECIMAL_PLACES,
        )?;
        self.rows += 1;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        if self.rows == 0 {
            writeln!(self.inner, "No clusters.")?;
        }
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

    #[test]
    fn test_table_lists_members() {
        let clusters = vec![ClusterDetails {
            id: 0,
            centroid: [-71.09, 42.34],
            point_count: 2,
            members: vec!["a".to_string(), "b".to_string()],
            label: LabelState::resolved(None),
        }];

        let mut writer = TableWriter::new(Vec::new());
        write_all(&mut writer, &clusters).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();

        assert!(text.contains("Nearby Location"));
        assert!(text.contains("a, b"));
        assert!(text.contains("42.340000"));
    }

    #[test]
    fn test_empty_table_says_so() {
        let mut writer = TableWriter::new(Vec::new());
        write_all(&mut writer, &[]).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert!(text.ends_with("No clusters.\n"));
    }

    #[test]
    fn test_pending_label_shown_as_dash() {
        let clusters = vec![ClusterDetails {
            id: 2,
            centroid: [0.0, 0.0],
            point_count: 1,
            members: vec!["solo".to_string()],
            label: LabelState::pending(),
        }];

        let mut writer = TableWriter::new(Vec::new());
        write_all(&mut writer, &clusters).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();

        assert!(!text.contains("Loading..."));
        assert!(text.contains(" - "));
    }
}
