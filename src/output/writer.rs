//! Output writer trait definition.

use crate::error::Result;
use crate::monitor::ClusterDetails;

/// Trait for writing cluster results.
pub trait OutputWriter {
    /// Write the header (if applicable).
    fn write_header(&mut self) -> Result<()>;

    /// Write a single cluster.
    fn write_cluster(&mut self, cluster: &ClusterDetails) -> Result<()>;

    /// Finalize the output (flush, close, etc.).
    fn finalize(&mut self) -> Result<()>;
}

/// Write every cluster through a writer, header and finalize included.
pub fn write_all(writer: &mut dyn OutputWriter, clusters: &[ClusterDetails]) -> Result<()> {
    writer.write_header()?;
    for cluster in clusters {
        writer.write_cluster(cluster)?;
    }
    writer.finalize()
}
