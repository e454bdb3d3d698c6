//! An air quality station.
//!
//! Periodically pulls pollutant and weather readings from a source, computes
//! an air quality snapshot, and publishes it to subscribed display surfaces:
//! the log, a JSON-lines stream, or a small LED-style face.
use std::time::Duration;

use aqi::Location;

pub mod config;
pub mod face;
pub mod ingest;
pub mod shutdown;
pub mod source;
pub mod surface;

pub use ingest::Station;

/// How the ingestion loop runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationSettings {
    /// Time between the end of one cycle and the start of the next.
    pub interval: Duration,
    /// Location to report when the source doesn't say.
    pub location: Option<Location>,
    /// Run a single cycle, then stop.
    pub once: bool,
}

impl Default for StationSettings {
    fn default() -> Self {
        StationSettings {
            interval: Duration::from_secs(600),
            location: None,
            once: false,
        }
    }
}
