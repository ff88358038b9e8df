use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::models::{DateRange, Metric, Observation};
use crate::utils::progress::ProgressReporter;

/// Row shape of the observation export. Empty cells deserialize to `None`.
#[derive(Debug, Deserialize)]
struct RawObservationRow {
    location: String,
    country: String,
    date: NaiveDate,
    temp_f: Option<f64>,
    precip_in: Option<f64>,
    snow_in: Option<f64>,
    snow_depth_in: Option<f64>,
    wind_mph: Option<f64>,
    humidity_pct: Option<f64>,
    cloud_pct: Option<f64>,
    solar_wm2: Option<f64>,
    precip_prob_pct: Option<f64>,
}

impl RawObservationRow {
    fn metric_values(&self) -> [(Metric, Option<f64>); 9] {
        [
            (Metric::Temperature, self.temp_f),
            (Metric::Precipitation, self.precip_in),
            (Metric::Snowfall, self.snow_in),
            (Metric::SnowDepth, self.snow_depth_in),
            (Metric::WindSpeed, self.wind_mph),
            (Metric::Humidity, self.humidity_pct),
            (Metric::CloudCover, self.cloud_pct),
            (Metric::SolarRadiation, self.solar_wm2),
            (Metric::PrecipProbability, self.precip_prob_pct),
        ]
    }
}

/// Row-level predicate applied while reading. This is the data-access side
/// of the pipeline; the core stages never filter.
#[derive(Debug, Clone, Default)]
pub struct ObservationFilter {
    date_range: Option<DateRange>,
    countries: Option<BTreeSet<String>>,
}

impl ObservationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.countries = Some(
            countries
                .into_iter()
                .map(|c| c.as_ref().trim().to_uppercase())
                .collect(),
        );
        self
    }

    pub fn accepts(&self, country: &str, date: NaiveDate) -> bool {
        if let Some(range) = &self.date_range {
            if !range.contains(date) {
                return false;
            }
        }
        if let Some(countries) = &self.countries {
            if !countries.contains(&country.trim().to_uppercase()) {
                return false;
            }
        }
        true
    }
}

pub struct ObservationReader;

impl ObservationReader {
    pub fn new() -> Self {
        Self
    }

    /// Read daily observations from a CSV export. A metric value outside
    /// its physical range (or non-finite) is dropped for that metric only;
    /// the rest of the row still contributes.
    pub fn read_observations(
        &self,
        path: &Path,
        filter: Option<&ObservationFilter>,
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<Observation>> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut observations = Vec::new();
        let mut filtered_rows = 0usize;
        let mut dropped_values = 0usize;

        for record in reader.deserialize() {
            let raw: RawObservationRow = record?;

            if let Some(f) = filter {
                if !f.accepts(&raw.country, raw.date) {
                    filtered_rows += 1;
                    continue;
                }
            }

            let mut obs = Observation::new(
                raw.location.trim().to_string(),
                raw.country.trim().to_uppercase(),
                raw.date,
            );
            for (metric, value) in raw.metric_values() {
                let Some(value) = value else { continue };
                if metric.is_valid_value(value) {
                    obs.set_metric(metric, value);
                } else {
                    dropped_values += 1;
                    debug!(
                        column = metric.column_name(),
                        value,
                        date = %raw.date,
                        "dropped out-of-range metric value"
                    );
                }
            }

            observations.push(obs);
            if let Some(p) = progress {
                p.increment(1);
            }
        }

        if filtered_rows > 0 || dropped_values > 0 {
            debug!(
                kept = observations.len(),
                filtered_rows, dropped_values, "finished reading observations"
            );
        }

        Ok(observations)
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}
