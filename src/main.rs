use clap::Parser;
use weather_rollup::cli::{run, Cli};
use weather_rollup::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
