use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Cli, Commands, OutputFormat, QueryKind};
use crate::error::{AnalysisError, Result};
use crate::models::DateRange;
use crate::queries::QueryCatalog;
use crate::readers::{ObservationFilter, ObservationReader};
use crate::utils::progress::ProgressReporter;
use crate::writers::RowWriter;

pub fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Report {
            input,
            query,
            top_k,
            start,
            end,
            countries,
            output,
            format,
            max_workers,
        } => {
            configure_workers(max_workers)?;

            let filter = build_filter(start, end, &countries)?;
            let progress = ProgressReporter::new_spinner("Reading observations...", false);
            let reader = ObservationReader::new();
            let observations =
                reader.read_observations(&input, filter.as_ref(), Some(&progress))?;
            progress.finish_with_message(&format!("Read {} observations", observations.len()));

            let catalog = QueryCatalog::with_builtin_patterns();
            let rows = match query {
                QueryKind::MonthlyTemperature => catalog.monthly_temperature(&observations)?,
                QueryKind::YearlyPrecipitation => catalog.yearly_precipitation(&observations)?,
                QueryKind::SnowiestDay => catalog.snowiest_day_per_city(&observations)?,
                QueryKind::StormDays => catalog.top_storm_days(&observations, top_k)?,
                QueryKind::WeekendHumidity => catalog.weekend_humidity(&observations)?,
            };
            info!(rows = rows.len(), "query complete");

            let writer = RowWriter::new();
            match (&output, format) {
                (Some(path), OutputFormat::Csv) => {
                    writer.write_csv_file(&rows, path)?;
                    println!("Wrote {} rows to {}", rows.len(), path.display());
                }
                (Some(path), OutputFormat::Json) => {
                    writer.write_json_file(&rows, path)?;
                    println!("Wrote {} rows to {}", rows.len(), path.display());
                }
                (None, OutputFormat::Csv) => {
                    let stdout = std::io::stdout();
                    writer.write_csv(&rows, stdout.lock())?;
                }
                (None, OutputFormat::Json) => {
                    let stdout = std::io::stdout();
                    writer.write_json(&rows, stdout.lock())?;
                }
            }
        }

        Commands::Normalize { label, country } => {
            let catalog = QueryCatalog::with_builtin_patterns();
            match catalog.normalizer().normalize(&label, &country) {
                Some(location) => println!("{:?} ({}) -> {}", label, country, location),
                None => println!("{:?} ({}) -> no match (row would be excluded)", label, country),
            }
        }

        Commands::Info { input } => {
            let reader = ObservationReader::new();
            let observations = reader.read_observations(&input, None, None)?;
            if observations.is_empty() {
                println!("No observations in {}", input.display());
                return Ok(());
            }

            let min_date = observations.iter().map(|o| o.date).min().unwrap_or_default();
            let max_date = observations.iter().map(|o| o.date).max().unwrap_or_default();

            let labels: BTreeSet<(&str, &str)> = observations
                .iter()
                .map(|o| (o.location_raw.as_str(), o.country.as_str()))
                .collect();
            let catalog = QueryCatalog::with_builtin_patterns();
            let matched = labels
                .iter()
                .filter(|(label, country)| catalog.normalizer().normalize(label, country).is_some())
                .count();

            let mut out = std::io::stdout().lock();
            writeln!(out, "Observations: {}", observations.len())?;
            writeln!(out, "Date range: {} to {}", min_date, max_date)?;
            writeln!(out, "Distinct location labels: {}", labels.len())?;
            writeln!(
                out,
                "Normalizer match rate: {}/{} labels ({:.1}%)",
                matched,
                labels.len(),
                (matched as f64 / labels.len() as f64) * 100.0
            )?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn configure_workers(max_workers: usize) -> Result<()> {
    if max_workers == 0 {
        return Err(AnalysisError::Config(
            "max_workers must be at least 1".to_string(),
        ));
    }
    // Ignore the error if a global pool already exists (e.g. repeated runs
    // in one process).
    let _ = rayon::ThreadPoolBuilder::new()
        .num_threads(max_workers)
        .build_global();
    Ok(())
}

fn build_filter(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    countries: &[String],
) -> Result<Option<ObservationFilter>> {
    if start.is_none() && end.is_none() && countries.is_empty() {
        return Ok(None);
    }

    let mut filter = ObservationFilter::new();
    if start.is_some() || end.is_some() {
        let range = DateRange::new(
            start.unwrap_or(NaiveDate::MIN),
            end.unwrap_or(NaiveDate::MAX),
        )?;
        filter = filter.with_date_range(range);
    }
    if !countries.is_empty() {
        filter = filter.with_countries(countries);
    }
    Ok(Some(filter))
}
