//! One-shot calculator: compute a snapshot from concentrations given on the
//! command line, and print it as JSON.
//!
//! Concentrations are in µg/m³, except CO in mg/m³.

use aqi::{Pollutant, ReadingBatch, Snapshot};
use chrono::Utc;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "aqi-calc", version)]
struct Args {
    #[arg(long)]
    pm25: Option<f64>,
    #[arg(long)]
    pm10: Option<f64>,
    #[arg(long)]
    no2: Option<f64>,
    #[arg(long)]
    so2: Option<f64>,
    /// In mg/m³.
    #[arg(long)]
    co: Option<f64>,
    #[arg(long)]
    o3: Option<f64>,
}

impl Args {
    fn batch(&self) -> ReadingBatch {
        [
            (Pollutant::Pm25, self.pm25),
            (Pollutant::Pm10, self.pm10),
            (Pollutant::No2, self.no2),
            (Pollutant::So2, self.so2),
            (Pollutant::Co, self.co),
            (Pollutant::O3, self.o3),
        ]
        .into_iter()
        .fold(ReadingBatch::default(), |batch, (p, c)| match c {
            Some(c) => batch.with(p, c),
            None => batch.without(p),
        })
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let snapshot = Snapshot::compute(&args.batch(), Utc::now());
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
