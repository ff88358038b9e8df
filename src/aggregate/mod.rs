mod engine;
pub mod time;

pub use engine::{
    AggregateResult, AggregationEngine, AggregationKey, DimValue, Dimension, MetricSpec,
    MetricSum, OutputUnit, Statistic,
};
