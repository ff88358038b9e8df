//! Prebuilt analytical questions wired through the full pipeline:
//! normalize, aggregate, rank, shape output rows.

use chrono::NaiveDate;
use tracing::info;

use crate::aggregate::{
    time, AggregationEngine, DimValue, Dimension, MetricSpec, OutputUnit,
};
use crate::error::Result;
use crate::models::{CellValue, Metric, NormalizedObservation, Observation, Row};
use crate::normalizer::LocationNormalizer;
use crate::ranking::{rank_global, rank_within_partitions, SortKey, SortValue};
use crate::utils::units::{inches_to_centimeters, round_to};

/// A per-day row carrying a composite storm score. The score is computed
/// once at construction and reused by both the comparator and the output
/// row, so selection and display can never disagree.
#[derive(Debug, Clone)]
struct StormDay {
    city: String,
    country: String,
    date: NaiveDate,
    precip_in: f64,
    snow_in: f64,
    score: f64,
}

impl StormDay {
    fn from_observation(row: &NormalizedObservation) -> Option<Self> {
        let precip_in = row.metric(Metric::Precipitation);
        let snow_in = row.metric(Metric::Snowfall);
        // A storm day needs at least one of the two components.
        if precip_in.is_none() && snow_in.is_none() {
            return None;
        }
        let precip_in = precip_in.unwrap_or(0.0);
        let snow_in = snow_in.unwrap_or(0.0);
        Some(Self {
            city: row.location.city.clone(),
            country: row.location.country.clone(),
            date: row.date,
            precip_in,
            snow_in,
            score: round_to(precip_in + snow_in, 2),
        })
    }
}

#[derive(Debug, Clone)]
struct SnowDay {
    city: String,
    country: String,
    date: NaiveDate,
    snow_in: f64,
}

/// The repeated business questions over the warehouse, each returning flat
/// rows with a stable column order.
pub struct QueryCatalog {
    normalizer: LocationNormalizer,
}

impl QueryCatalog {
    pub fn new(normalizer: LocationNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn with_builtin_patterns() -> Self {
        Self::new(LocationNormalizer::with_builtin_patterns())
    }

    fn normalize(&self, observations: &[Observation]) -> Vec<NormalizedObservation> {
        let normalized = self.normalizer.normalize_all(observations);
        info!(
            input = observations.len(),
            normalized = normalized.len(),
            "location normalization complete"
        );
        normalized
    }

    /// Mean temperature per city per calendar month, in °C.
    pub fn monthly_temperature(&self, observations: &[Observation]) -> Result<Vec<Row>> {
        let rows = self.normalize(observations);
        let engine = AggregationEngine::new(vec![MetricSpec::mean(Metric::Temperature)
            .in_unit(OutputUnit::Celsius)
            .rounded_to(1)])?;
        let results = engine.aggregate(
            &rows,
            &[
                Dimension::City,
                Dimension::Country,
                Dimension::Year,
                Dimension::Month,
            ],
        );

        Ok(results
            .into_iter()
            .filter_map(|agg| {
                let avg = *agg.derived.get(&Metric::Temperature)?;
                Some(
                    Row::new()
                        .with("city", dim_cell(&agg.key[0]))
                        .with("country", dim_cell(&agg.key[1]))
                        .with("year", dim_cell(&agg.key[2]))
                        .with("month", dim_cell(&agg.key[3]))
                        .with("days", CellValue::Int(agg.count as i64))
                        .with("avg_temp_c", CellValue::Float(avg)),
                )
            })
            .collect())
    }

    /// Total precipitation per city per year, converted to centimeters.
    pub fn yearly_precipitation(&self, observations: &[Observation]) -> Result<Vec<Row>> {
        let rows = self.normalize(observations);
        let engine = AggregationEngine::new(vec![MetricSpec::sum(Metric::Precipitation)
            .in_unit(OutputUnit::Centimeters)
            .rounded_to(1)])?;
        let results = engine.aggregate(
            &rows,
            &[Dimension::City, Dimension::Country, Dimension::Year],
        );

        Ok(results
            .into_iter()
            .filter_map(|agg| {
                let total = *agg.derived.get(&Metric::Precipitation)?;
                Some(
                    Row::new()
                        .with("city", dim_cell(&agg.key[0]))
                        .with("country", dim_cell(&agg.key[1]))
                        .with("year", dim_cell(&agg.key[2]))
                        .with("days", CellValue::Int(agg.count as i64))
                        .with("total_precip_cm", CellValue::Float(total)),
                )
            })
            .collect())
    }

    /// The single snowiest day per city; earlier date wins a snowfall tie.
    pub fn snowiest_day_per_city(&self, observations: &[Observation]) -> Result<Vec<Row>> {
        let days: Vec<SnowDay> = self
            .normalize(observations)
            .into_iter()
            .filter_map(|row| {
                row.metric(Metric::Snowfall).map(|snow_in| SnowDay {
                    city: row.location.city.clone(),
                    country: row.location.country.clone(),
                    date: row.date,
                    snow_in,
                })
            })
            .collect();

        let comparator = vec![
            SortKey::desc(|d: &SnowDay| SortValue::Float(d.snow_in)),
            SortKey::asc(|d: &SnowDay| SortValue::Date(d.date)),
        ];
        let top = rank_within_partitions(
            days,
            |d| (d.city.clone(), d.country.clone()),
            &comparator,
            1,
        )?;

        Ok(top
            .into_iter()
            .map(|d| {
                Row::new()
                    .with("city", CellValue::Text(d.city))
                    .with("country", CellValue::Text(d.country))
                    .with("date", CellValue::Date(d.date))
                    .with("snow_in", CellValue::Float(round_to(d.snow_in, 2)))
                    .with(
                        "snow_cm",
                        CellValue::Float(round_to(inches_to_centimeters(d.snow_in), 1)),
                    )
            })
            .collect())
    }

    /// Global top-N days by storm score (precipitation + snowfall, inches).
    /// Ties break on date then city so the ordering is fully determined.
    pub fn top_storm_days(&self, observations: &[Observation], top_k: usize) -> Result<Vec<Row>> {
        let days: Vec<StormDay> = self
            .normalize(observations)
            .iter()
            .filter_map(StormDay::from_observation)
            .collect();

        let comparator = vec![
            SortKey::desc(|d: &StormDay| SortValue::Float(d.score)),
            SortKey::asc(|d: &StormDay| SortValue::Date(d.date)),
            SortKey::asc(|d: &StormDay| SortValue::Text(d.city.clone())),
        ];
        let top = rank_global(days, &comparator, top_k)?;

        Ok(top
            .into_iter()
            .map(|d| {
                Row::new()
                    .with("city", CellValue::Text(d.city))
                    .with("country", CellValue::Text(d.country))
                    .with("date", CellValue::Date(d.date))
                    .with("precip_in", CellValue::Float(round_to(d.precip_in, 2)))
                    .with("snow_in", CellValue::Float(round_to(d.snow_in, 2)))
                    .with("storm_score", CellValue::Float(d.score))
            })
            .collect())
    }

    /// Mean humidity per city, split weekend vs weekday (weekend =
    /// Saturday or Sunday, see `aggregate::time`).
    pub fn weekend_humidity(&self, observations: &[Observation]) -> Result<Vec<Row>> {
        let rows = self.normalize(observations);
        let engine =
            AggregationEngine::new(vec![MetricSpec::mean(Metric::Humidity).rounded_to(1)])?;
        let results = engine.aggregate_with(&rows, |row| {
            vec![
                DimValue::Text(row.location.city.clone()),
                DimValue::Text(row.location.country.clone()),
                DimValue::Int(time::is_weekend(row.date) as i64),
            ]
        });

        Ok(results
            .into_iter()
            .filter_map(|agg| {
                let avg = *agg.derived.get(&Metric::Humidity)?;
                let day_kind = match &agg.key[2] {
                    DimValue::Int(1) => "weekend",
                    _ => "weekday",
                };
                Some(
                    Row::new()
                        .with("city", dim_cell(&agg.key[0]))
                        .with("country", dim_cell(&agg.key[1]))
                        .with("day_kind", CellValue::Text(day_kind.to_string()))
                        .with("days", CellValue::Int(agg.count as i64))
                        .with("avg_humidity_pct", CellValue::Float(avg)),
                )
            })
            .collect())
    }

    pub fn normalizer(&self) -> &LocationNormalizer {
        &self.normalizer
    }
}

impl Default for QueryCatalog {
    fn default() -> Self {
        Self::with_builtin_patterns()
    }
}

fn dim_cell(value: &DimValue) -> CellValue {
    match value {
        DimValue::Text(s) => CellValue::Text(s.clone()),
        DimValue::Int(i) => CellValue::Int(*i),
    }
}
