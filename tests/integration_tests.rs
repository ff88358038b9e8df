use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

use weather_rollup::models::{CellValue, Metric, Observation};
use weather_rollup::queries::QueryCatalog;
use weather_rollup::readers::{ObservationFilter, ObservationReader};
use weather_rollup::writers::RowWriter;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_csv_to_report_pipeline() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "location,country,date,temp_f,precip_in,snow_in,snow_depth_in,wind_mph,humidity_pct,cloud_pct,solar_wm2,precip_prob_pct"
    )
    .unwrap();
    writeln!(file, "Paris 14e,FR,2025-01-15,50.0,,,,,,,,").unwrap();
    writeln!(file, "Paris-Montsouris,FR,2025-01-20,60.0,,,,,,,,").unwrap();
    writeln!(file, "Berlin Mitte,DE,2025-01-10,40.0,,,,,,,,").unwrap();
    writeln!(file, "Gotham City,US,2025-01-12,70.0,,,,,,,,").unwrap();

    let reader = ObservationReader::new();
    let observations = reader.read_observations(file.path(), None, None).unwrap();
    assert_eq!(observations.len(), 4);

    let catalog = QueryCatalog::with_builtin_patterns();
    let rows = catalog.monthly_temperature(&observations).unwrap();

    // Gotham City has no pattern and is excluded, not coerced.
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("city"), Some(&CellValue::Text("Berlin".into())));
    assert_eq!(rows[0].get("avg_temp_c"), Some(&CellValue::Float(4.4)));
    assert_eq!(rows[1].get("city"), Some(&CellValue::Text("Paris".into())));
    assert_eq!(rows[1].get("avg_temp_c"), Some(&CellValue::Float(12.8)));

    // Rows export with the query's stable column ordering.
    let mut buffer = Vec::new();
    RowWriter::new().write_csv(&rows, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert_eq!(
        text.lines().next().unwrap(),
        "city,country,year,month,days,avg_temp_c"
    );
}

#[test]
fn test_country_filter_applies_before_normalization() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "location,country,date,temp_f,precip_in,snow_in,snow_depth_in,wind_mph,humidity_pct,cloud_pct,solar_wm2,precip_prob_pct"
    )
    .unwrap();
    writeln!(file, "Nice,FR,2025-07-01,80.0,,,,,,,,").unwrap();
    writeln!(file, "Nice,PL,2025-07-01,75.0,,,,,,,,").unwrap();

    let filter = ObservationFilter::new().with_countries(["PL"]);
    let reader = ObservationReader::new();
    let observations = reader
        .read_observations(file.path(), Some(&filter), None)
        .unwrap();
    assert_eq!(observations.len(), 1);

    let catalog = QueryCatalog::with_builtin_patterns();
    let rows = catalog.monthly_temperature(&observations).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("country"), Some(&CellValue::Text("PL".into())));
}

#[test]
fn test_report_is_reproducible_across_runs() {
    let observations: Vec<Observation> = (0..50)
        .map(|i| {
            let city = if i % 2 == 0 { "Warsaw" } else { "Krakow" };
            Observation::new(city, "PL", date(2025, 1 + (i % 12) as u32, 1 + (i % 28) as u32))
                .with_metric(Metric::Precipitation, (i as f64) * 0.07)
                .with_metric(Metric::Snowfall, ((i * 3) % 11) as f64 * 0.3)
        })
        .collect();

    let catalog = QueryCatalog::with_builtin_patterns();
    let first = catalog.top_storm_days(&observations, 5).unwrap();
    let second = catalog.top_storm_days(&observations, 5).unwrap();

    assert_eq!(first.len(), 5);
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.column_names(), b.column_names());
        for name in a.column_names() {
            assert_eq!(a.get(name), b.get(name));
        }
    }
}

#[test]
fn test_storm_days_fewer_rows_than_top_k() {
    let observations = vec![
        Observation::new("Oslo", "NO", date(2025, 2, 1)).with_metric(Metric::Snowfall, 3.0),
        Observation::new("Oslo", "NO", date(2025, 2, 2)).with_metric(Metric::Precipitation, 0.5),
    ];

    let catalog = QueryCatalog::with_builtin_patterns();
    let rows = catalog.top_storm_days(&observations, 100).unwrap();
    // Never pads, never errors.
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_invalid_top_k_is_rejected() {
    let observations =
        vec![Observation::new("Oslo", "NO", date(2025, 2, 1)).with_metric(Metric::Snowfall, 3.0)];
    let catalog = QueryCatalog::with_builtin_patterns();
    assert!(catalog.top_storm_days(&observations, 0).is_err());
}
