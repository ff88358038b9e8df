pub mod location;
pub mod observation;
pub mod row;

pub use location::CanonicalLocation;
pub use observation::{DateRange, Metric, NormalizedObservation, Observation};
pub use row::{CellValue, Row};
