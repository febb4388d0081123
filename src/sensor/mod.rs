//! Sensor readings, snapshot loading and location filtering.

mod filter;
mod reading;
mod snapshot;

pub use filter::{LocationFilter, available_locations};
pub use reading::{ReadingError, SensorReading};
pub use snapshot::{load_snapshot, parse_snapshot_json};
