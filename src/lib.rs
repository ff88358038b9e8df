pub mod aggregate;
pub mod cli;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod queries;
pub mod ranking;
pub mod readers;
pub mod utils;
pub mod writers;

pub use error::{AnalysisError, Result};
