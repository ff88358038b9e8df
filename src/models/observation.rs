use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{AnalysisError, Result};
use crate::models::CanonicalLocation;
use crate::utils::constants::*;

/// Daily observation metrics, each carried in its native warehouse unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Air temperature, °F
    Temperature,
    /// Precipitation, inches
    Precipitation,
    /// Snowfall, inches
    Snowfall,
    /// Snow depth, inches
    SnowDepth,
    /// Wind speed, mph
    WindSpeed,
    /// Relative humidity, percent
    Humidity,
    /// Cloud cover, percent
    CloudCover,
    /// Solar radiation, W/m²
    SolarRadiation,
    /// Probability of precipitation, percent
    PrecipProbability,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::Temperature,
        Metric::Precipitation,
        Metric::Snowfall,
        Metric::SnowDepth,
        Metric::WindSpeed,
        Metric::Humidity,
        Metric::CloudCover,
        Metric::SolarRadiation,
        Metric::PrecipProbability,
    ];

    /// Column name used in input files and output rows.
    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::Temperature => "temp_f",
            Metric::Precipitation => "precip_in",
            Metric::Snowfall => "snow_in",
            Metric::SnowDepth => "snow_depth_in",
            Metric::WindSpeed => "wind_mph",
            Metric::Humidity => "humidity_pct",
            Metric::CloudCover => "cloud_pct",
            Metric::SolarRadiation => "solar_wm2",
            Metric::PrecipProbability => "precip_prob_pct",
        }
    }

    /// Physical validity bounds in the metric's native unit. Values outside
    /// the range are treated as missing for that metric only.
    pub fn valid_range(&self) -> (f64, f64) {
        match self {
            Metric::Temperature => (MIN_VALID_TEMP_F, MAX_VALID_TEMP_F),
            Metric::Precipitation => (MIN_VALID_PRECIP_IN, MAX_VALID_PRECIP_IN),
            Metric::Snowfall => (MIN_VALID_SNOW_IN, MAX_VALID_SNOW_IN),
            Metric::SnowDepth => (MIN_VALID_SNOW_DEPTH_IN, MAX_VALID_SNOW_DEPTH_IN),
            Metric::WindSpeed => (MIN_VALID_WIND_MPH, MAX_VALID_WIND_MPH),
            Metric::Humidity | Metric::CloudCover | Metric::PrecipProbability => {
                (MIN_VALID_PCT, MAX_VALID_PCT)
            }
            Metric::SolarRadiation => (MIN_VALID_SOLAR_WM2, MAX_VALID_SOLAR_WM2),
        }
    }

    pub fn is_valid_value(&self, value: f64) -> bool {
        let (min, max) = self.valid_range();
        value.is_finite() && (min..=max).contains(&value)
    }
}

/// A raw daily observation as supplied by the warehouse. Immutable once
/// built; non-finite metric values are never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub location_raw: String,
    pub country: String,
    pub date: NaiveDate,
    pub metrics: BTreeMap<Metric, f64>,
}

impl Observation {
    pub fn new(location_raw: impl Into<String>, country: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            location_raw: location_raw.into(),
            country: country.into(),
            date,
            metrics: BTreeMap::new(),
        }
    }

    /// Builder-style metric attachment; non-finite values are dropped.
    pub fn with_metric(mut self, metric: Metric, value: f64) -> Self {
        self.set_metric(metric, value);
        self
    }

    pub fn set_metric(&mut self, metric: Metric, value: f64) {
        if value.is_finite() {
            self.metrics.insert(metric, value);
        }
    }

    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(&metric).copied()
    }

    pub fn has_metric(&self, metric: Metric) -> bool {
        self.metrics.contains_key(&metric)
    }
}

/// An observation whose location label has resolved to a canonical entity.
/// This is the unit of work for aggregation and ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedObservation {
    pub location: CanonicalLocation,
    pub date: NaiveDate,
    pub metrics: BTreeMap<Metric, f64>,
}

impl NormalizedObservation {
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(&metric).copied()
    }
}

/// Closed calendar range. Construction rejects an inverted range up front:
/// that is a caller mistake, not data noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(AnalysisError::Config(format!(
                "date range end {} precedes start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
