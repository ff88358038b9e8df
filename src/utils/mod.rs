pub mod constants;
pub mod progress;
pub mod units;
