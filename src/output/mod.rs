//! Output format writers.

mod csv;
mod json;
mod table;
mod types;
mod writer;

pub use csv::CsvWriter;
pub use json::{JsonReport, JsonWriter};
pub use table::TableWriter;
pub use types::{OutputFormat, ReportContext, RunSettings};
pub use writer::{OutputWriter, write_all};

use crate::error::Result;
use crate::monitor::ClusterDetails;
use std::io::Write;

/// Write clusters in the given format.
pub fn write_clusters<W: Write>(
    inner: W,
    format: OutputFormat,
    context: ReportContext,
    clusters: &[ClusterDetails],
) -> Result<()> {
    match format {
        OutputFormat::Table => write_all(&mut TableWriter::new(inner), clusters),
        OutputFormat::Json => write_all(&mut JsonWriter::new(inner, context), clusters),
        OutputFormat::Csv => write_all(&mut CsvWriter::new(inner), clusters),
    }
}
