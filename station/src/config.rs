//! Command-line configuration of the station.

use std::{path::PathBuf, time::Duration};

use aqi::Location;
use clap::Parser;

use crate::StationSettings;

/// Compute and display the air quality index from pollutant readings.
#[derive(Debug, Parser)]
#[command(name = "station", version)]
pub struct Args {
    /// Payload document to read readings from on every cycle.
    /// Without one, every cycle sees an empty batch.
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Seconds between cycles.
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Latitude of the station, used when the payload has none.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the station, used when the payload has none.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Run a single cycle and exit.
    #[arg(long)]
    pub once: bool,

    /// Write each snapshot to stdout as a line of JSON.
    #[arg(long)]
    pub json: bool,

    /// Draw each snapshot to stdout as a text-rendered LED face.
    #[arg(long)]
    pub face: bool,
}

impl Args {
    pub fn settings(&self) -> StationSettings {
        let location = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Location { lat, lon }),
            _ => None,
        };
        StationSettings {
            interval: Duration::from_secs(self.interval),
            location,
            once: self.once,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["station"]).unwrap();
        assert_eq!(args.source, None);
        assert!(!args.json);
        assert!(!args.face);
        assert_eq!(args.settings(), StationSettings::default());
    }

    #[test]
    fn all_flags() {
        let args = Args::try_parse_from([
            "station",
            "--source",
            "/tmp/payload.json",
            "--interval",
            "30",
            "--lat",
            "28.41",
            "--lon",
            "-77.31",
            "--once",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.source, Some(PathBuf::from("/tmp/payload.json")));
        assert!(args.json);
        let settings = args.settings();
        assert_eq!(settings.interval, Duration::from_secs(30));
        assert_eq!(
            settings.location,
            Some(Location {
                lat: 28.41,
                lon: -77.31
            })
        );
        assert!(settings.once);
    }

    #[test]
    fn half_a_location_is_rejected() {
        assert!(Args::try_parse_from(["station", "--lat", "1.0"]).is_err());
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(Args::try_parse_from(["station", "--interval", "0"]).is_err());
    }
}
