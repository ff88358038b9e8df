use serde::Serialize;
use std::collections::BTreeMap;

use crate::aggregate::time;
use crate::error::{AnalysisError, Result};
use crate::models::{Metric, NormalizedObservation};
use crate::utils::units::{fahrenheit_to_celsius, inches_to_centimeters, round_to};

/// A grouping dimension extracted from a normalized observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dimension {
    City,
    Country,
    Year,
    Month,
    DayOfWeek,
}

impl Dimension {
    pub fn column_name(&self) -> &'static str {
        match self {
            Dimension::City => "city",
            Dimension::Country => "country",
            Dimension::Year => "year",
            Dimension::Month => "month",
            Dimension::DayOfWeek => "day_of_week",
        }
    }

    pub fn value_of(&self, row: &NormalizedObservation) -> DimValue {
        match self {
            Dimension::City => DimValue::Text(row.location.city.clone()),
            Dimension::Country => DimValue::Text(row.location.country.clone()),
            Dimension::Year => DimValue::Int(time::year(row.date)),
            Dimension::Month => DimValue::Int(time::month(row.date)),
            Dimension::DayOfWeek => DimValue::Int(time::day_of_week(row.date)),
        }
    }
}

/// A single dimension value. Keys compare lexicographically over their
/// components, which gives the deterministic output order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DimValue {
    Text(String),
    Int(i64),
}

/// Ordered tuple of dimension values identifying one group.
pub type AggregationKey = Vec<DimValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Statistic {
    Mean,
    Sum,
}

/// Target unit for a derived value. Conversion happens at finalization,
/// never during accumulation, so rounding order cannot drift with input
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutputUnit {
    Native,
    /// From °F
    Celsius,
    /// From inches
    Centimeters,
}

impl OutputUnit {
    fn convert(&self, value: f64) -> f64 {
        match self {
            OutputUnit::Native => value,
            OutputUnit::Celsius => fahrenheit_to_celsius(value),
            OutputUnit::Centimeters => inches_to_centimeters(value),
        }
    }
}

/// What to derive for one metric at finalization.
#[derive(Debug, Clone, Copy)]
pub struct MetricSpec {
    pub metric: Metric,
    pub statistic: Statistic,
    pub unit: OutputUnit,
    pub decimals: u8,
}

impl MetricSpec {
    pub fn mean(metric: Metric) -> Self {
        Self {
            metric,
            statistic: Statistic::Mean,
            unit: OutputUnit::Native,
            decimals: crate::utils::constants::DEFAULT_DECIMALS,
        }
    }

    pub fn sum(metric: Metric) -> Self {
        Self {
            statistic: Statistic::Sum,
            ..Self::mean(metric)
        }
    }

    pub fn in_unit(mut self, unit: OutputUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn rounded_to(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }
}

/// Native-unit accumulator for one metric within one group. `samples`
/// tracks how many observations actually carried the metric, which may be
/// fewer than the group's row count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricSum {
    pub sum: f64,
    pub samples: u64,
}

/// One output group: the key, the row count, the raw native-unit sums, and
/// the finalized derived values. A metric with zero samples in the group is
/// absent from `derived` rather than surfacing as NaN.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateResult {
    pub key: AggregationKey,
    pub count: u64,
    pub sums: BTreeMap<Metric, MetricSum>,
    pub derived: BTreeMap<Metric, f64>,
}

/// Groups observations by a key function and accumulates per-metric sums.
/// Averaging, unit conversion and rounding happen once per group at
/// finalization. Accumulation is sequential on purpose: merging partial
/// float sums across threads would make the result depend on the run.
pub struct AggregationEngine {
    specs: Vec<MetricSpec>,
}

impl AggregationEngine {
    /// Duplicate metrics are rejected here: `derived` is keyed by metric,
    /// so two specs for the same metric would be a silent overwrite.
    pub fn new(specs: Vec<MetricSpec>) -> Result<Self> {
        let mut seen = std::collections::BTreeSet::new();
        for spec in &specs {
            if !seen.insert(spec.metric) {
                return Err(AnalysisError::Config(format!(
                    "duplicate metric spec for column '{}'",
                    spec.metric.column_name()
                )));
            }
        }
        Ok(Self { specs })
    }

    pub fn specs(&self) -> &[MetricSpec] {
        &self.specs
    }

    /// Group by a tuple of named dimensions.
    pub fn aggregate(
        &self,
        rows: &[NormalizedObservation],
        dims: &[Dimension],
    ) -> Vec<AggregateResult> {
        self.aggregate_with(rows, |row| dims.iter().map(|d| d.value_of(row)).collect())
    }

    /// Group by an arbitrary key function. Output is sorted by key; groups
    /// exist only for observed keys, so `count >= 1` always holds.
    pub fn aggregate_with<F>(&self, rows: &[NormalizedObservation], key_fn: F) -> Vec<AggregateResult>
    where
        F: Fn(&NormalizedObservation) -> AggregationKey,
    {
        let mut groups: BTreeMap<AggregationKey, (u64, BTreeMap<Metric, MetricSum>)> =
            BTreeMap::new();

        for row in rows {
            let entry = groups.entry(key_fn(row)).or_default();
            entry.0 += 1;
            for spec in &self.specs {
                if let Some(value) = row.metric(spec.metric) {
                    let acc = entry.1.entry(spec.metric).or_default();
                    acc.sum += value;
                    acc.samples += 1;
                }
            }
        }

        groups
            .into_iter()
            .map(|(key, (count, sums))| {
                let derived = self.finalize(&sums);
                AggregateResult {
                    key,
                    count,
                    sums,
                    derived,
                }
            })
            .collect()
    }

    fn finalize(&self, sums: &BTreeMap<Metric, MetricSum>) -> BTreeMap<Metric, f64> {
        let mut derived = BTreeMap::new();
        for spec in &self.specs {
            let Some(acc) = sums.get(&spec.metric) else {
                continue;
            };
            if acc.samples == 0 {
                continue;
            }
            let native = match spec.statistic {
                Statistic::Mean => acc.sum / acc.samples as f64,
                Statistic::Sum => acc.sum,
            };
            derived.insert(spec.metric, round_to(spec.unit.convert(native), spec.decimals));
        }
        derived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::models::{CanonicalLocation, Observation};
    use crate::normalizer::LocationNormalizer;

    fn obs(label: &str, country: &str, ymd: (i32, u32, u32)) -> Observation {
        let date = NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).unwrap();
        Observation::new(label, country, date)
    }

    fn normalized(observations: Vec<Observation>) -> Vec<NormalizedObservation> {
        LocationNormalizer::with_builtin_patterns().normalize_all(&observations)
    }

    #[test]
    fn test_duplicate_metric_spec_is_config_error() {
        let result = AggregationEngine::new(vec![
            MetricSpec::mean(Metric::Temperature),
            MetricSpec::sum(Metric::Temperature),
        ]);
        assert!(matches!(result, Err(AnalysisError::Config(_))));
    }

    #[test]
    fn test_monthly_mean_celsius_example() {
        // Paris 50°F + 60°F in January, Berlin 40°F: mean of 55°F → 12.8°C,
        // 40°F → 4.4°C after single-point rounding.
        let rows = normalized(vec![
            obs("Paris", "FR", (2025, 1, 15)).with_metric(Metric::Temperature, 50.0),
            obs("Paris", "FR", (2025, 1, 20)).with_metric(Metric::Temperature, 60.0),
            obs("Berlin", "DE", (2025, 1, 10)).with_metric(Metric::Temperature, 40.0),
        ]);

        let engine = AggregationEngine::new(vec![MetricSpec::mean(Metric::Temperature)
            .in_unit(OutputUnit::Celsius)
            .rounded_to(1)])
        .unwrap();
        let results = engine.aggregate(&rows, &[Dimension::City, Dimension::Month]);

        assert_eq!(results.len(), 2);
        // BTreeMap ordering: "Berlin" < "Paris"
        assert_eq!(
            results[0].key,
            vec![DimValue::Text("Berlin".to_string()), DimValue::Int(1)]
        );
        assert_eq!(results[0].count, 1);
        assert_eq!(results[0].derived[&Metric::Temperature], 4.4);

        assert_eq!(
            results[1].key,
            vec![DimValue::Text("Paris".to_string()), DimValue::Int(1)]
        );
        assert_eq!(results[1].count, 2);
        assert_eq!(results[1].derived[&Metric::Temperature], 12.8);
    }

    #[test]
    fn test_sums_round_trip_against_direct_average() {
        let values = [3.7, 12.05, 0.0, 55.5, 41.3, 8.88, 19.2];
        let rows: Vec<NormalizedObservation> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| NormalizedObservation {
                location: CanonicalLocation::new("Warsaw", "PL"),
                date: NaiveDate::from_ymd_opt(2025, 3, i as u32 + 1).unwrap(),
                metrics: [(Metric::Temperature, v)].into_iter().collect(),
            })
            .collect();

        let engine = AggregationEngine::new(vec![
            MetricSpec::mean(Metric::Temperature).rounded_to(6)
        ])
        .unwrap();
        let results = engine.aggregate(&rows, &[Dimension::City]);
        assert_eq!(results.len(), 1);

        let acc = &results[0].sums[&Metric::Temperature];
        let rederived = acc.sum / acc.samples as f64;
        let direct: f64 = values.iter().sum::<f64>() / values.len() as f64;

        assert!((rederived - direct).abs() < 1e-6);
        assert_eq!(acc.samples, values.len() as u64);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let rows = normalized(vec![
            obs("Warszawa-Centrum", "PL", (2025, 2, 1)).with_metric(Metric::Precipitation, 0.4),
            obs("Krakow", "PL", (2025, 2, 2)).with_metric(Metric::Precipitation, 1.1),
            obs("Warsaw", "PL", (2025, 2, 3)).with_metric(Metric::Precipitation, 0.2),
        ]);

        let engine = AggregationEngine::new(vec![MetricSpec::sum(Metric::Precipitation)
            .in_unit(OutputUnit::Centimeters)
            .rounded_to(2)])
        .unwrap();

        let first = engine.aggregate(&rows, &[Dimension::City, Dimension::Year]);
        let second = engine.aggregate(&rows, &[Dimension::City, Dimension::Year]);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.key, b.key);
            assert_eq!(a.count, b.count);
            assert_eq!(a.derived, b.derived);
        }
    }

    #[test]
    fn test_metric_missing_for_whole_group_is_absent_from_derived() {
        let rows = normalized(vec![
            obs("Berlin", "DE", (2025, 1, 10)).with_metric(Metric::Temperature, 40.0),
            obs("Berlin", "DE", (2025, 1, 11)).with_metric(Metric::Temperature, 42.0),
        ]);

        let engine = AggregationEngine::new(vec![
            MetricSpec::mean(Metric::Temperature).rounded_to(1),
            MetricSpec::mean(Metric::Snowfall).rounded_to(1),
        ])
        .unwrap();
        let results = engine.aggregate(&rows, &[Dimension::City]);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].count, 2);
        assert!(results[0].derived.contains_key(&Metric::Temperature));
        assert!(!results[0].derived.contains_key(&Metric::Snowfall));
    }

    #[test]
    fn test_partial_metric_uses_its_own_sample_count() {
        // Humidity present on two of three rows: its mean divides by 2,
        // while count stays 3.
        let rows = normalized(vec![
            obs("Madrid", "ES", (2025, 6, 1))
                .with_metric(Metric::Temperature, 80.0)
                .with_metric(Metric::Humidity, 30.0),
            obs("Madrid", "ES", (2025, 6, 2)).with_metric(Metric::Temperature, 90.0),
            obs("Madrid", "ES", (2025, 6, 3))
                .with_metric(Metric::Temperature, 85.0)
                .with_metric(Metric::Humidity, 50.0),
        ]);

        let engine =
            AggregationEngine::new(vec![MetricSpec::mean(Metric::Humidity).rounded_to(1)]).unwrap();
        let results = engine.aggregate(&rows, &[Dimension::City]);

        assert_eq!(results[0].count, 3);
        assert_eq!(results[0].sums[&Metric::Humidity].samples, 2);
        assert_eq!(results[0].derived[&Metric::Humidity], 40.0);
    }

    #[test]
    fn test_aggregate_with_custom_key() {
        let rows = normalized(vec![
            obs("London", "GB", (2025, 1, 18)).with_metric(Metric::Humidity, 80.0), // Sat
            obs("London", "GB", (2025, 1, 20)).with_metric(Metric::Humidity, 60.0), // Mon
            obs("London", "GB", (2025, 1, 19)).with_metric(Metric::Humidity, 90.0), // Sun
        ]);

        let engine =
            AggregationEngine::new(vec![MetricSpec::mean(Metric::Humidity).rounded_to(1)]).unwrap();
        let results = engine.aggregate_with(&rows, |row| {
            vec![
                DimValue::Text(row.location.city.clone()),
                DimValue::Int(time::is_weekend(row.date) as i64),
            ]
        });

        assert_eq!(results.len(), 2);
        // weekday group (0) sorts before weekend group (1)
        assert_eq!(results[0].derived[&Metric::Humidity], 60.0);
        assert_eq!(results[1].derived[&Metric::Humidity], 85.0);
    }
}
