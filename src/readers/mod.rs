mod observation_reader;

pub use observation_reader::{ObservationFilter, ObservationReader};
