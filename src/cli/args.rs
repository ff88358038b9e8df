use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::utils::constants::DEFAULT_TOP_K;

#[derive(Parser)]
#[command(name = "weather-rollup")]
#[command(about = "Location-normalized aggregation and ranking over daily weather observations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QueryKind {
    /// Mean temperature per city per month (°C)
    MonthlyTemperature,
    /// Total precipitation per city per year (cm)
    YearlyPrecipitation,
    /// Single snowiest day per city
    SnowiestDay,
    /// Global top-N days by storm score
    StormDays,
    /// Mean humidity per city, weekend vs weekday
    WeekendHumidity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a named query over an observation CSV export
    Report {
        #[arg(short, long, help = "Input observations CSV file")]
        input: PathBuf,

        #[arg(short, long, value_enum, help = "Query to run")]
        query: QueryKind,

        #[arg(long, default_value_t = DEFAULT_TOP_K, help = "Top-K for ranking queries")]
        top_k: usize,

        #[arg(long, help = "Start date (YYYY-MM-DD, inclusive)")]
        start: Option<NaiveDate>,

        #[arg(long, help = "End date (YYYY-MM-DD, inclusive)")]
        end: Option<NaiveDate>,

        #[arg(long, help = "Restrict to ISO country codes", value_delimiter = ',')]
        countries: Vec<String>,

        #[arg(short, long, help = "Output file [default: stdout]")]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,

        #[arg(long, default_value_t = num_cpus::get(), help = "Worker threads for ranking")]
        max_workers: usize,
    },

    /// Resolve a single raw location label against the pattern table
    Normalize {
        #[arg(help = "Raw location label")]
        label: String,

        #[arg(help = "ISO country code of the observation")]
        country: String,
    },

    /// Summarize an observation CSV: row counts, date span, match rate
    Info {
        #[arg(short, long, help = "Input observations CSV file")]
        input: PathBuf,
    },
}
