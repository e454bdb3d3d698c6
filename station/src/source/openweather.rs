//! Decode OpenWeather-shaped payloads into reading batches.
//!
//! The payload document bundles two upstream responses:
//!
//! ```json
//! {
//!   "air_pollution": {
//!     "coord": { "lat": 28.41, "lon": 77.31 },
//!     "list": [{ "dt": 1729300000, "components": { "pm2_5": 45.2, "pm10": 71.0, "co": 540.7, "nh3": 3.1 } }]
//!   },
//!   "weather": { "dt": 1729300100, "main": { "temp": 24.6, "humidity": 58 } }
//! }
//! ```
//!
//! - `air_pollution` is the `/data/2.5/air_pollution` response; only the first
//!   entry of `.list[]` is used.
//!     - `.components` holds concentrations in µg/m³, CO included.
//!     - It also reports NO and NH3, which have no breakpoint table.
//! - `weather` is the `/data/2.5/weather` response with `units=metric`:
//!     - `.main.temp` in °C, `.main.humidity` in %.
//!
//! Every field is optional. Anything missing, null, or not a number becomes
//! an absent value, never a zero, and leaves the other fields alone.

use std::collections::BTreeMap;

use aqi::{Location, Pollutant, RawReading, ReadingBatch};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::SourceError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Payload {
    air_pollution: Option<AirPollution>,
    weather: Option<Weather>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AirPollution {
    coord: Option<Coord>,
    list: Vec<PollutionEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PollutionEntry {
    dt: Option<Value>,
    components: BTreeMap<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Weather {
    coord: Option<Coord>,
    dt: Option<Value>,
    main: Option<WeatherMain>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WeatherMain {
    temp: Option<Value>,
    humidity: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Coord {
    lat: Option<Value>,
    lon: Option<Value>,
}

impl Coord {
    fn location(&self) -> Option<Location> {
        Some(Location {
            lat: number(self.lat.as_ref(), "coord.lat")?,
            lon: number(self.lon.as_ref(), "coord.lon")?,
        })
    }
}

/// A numeric field, or `None` if it is missing, null, or not a number.
fn number(value: Option<&Value>, field: &str) -> Option<f64> {
    match value? {
        Value::Null => None,
        v => {
            let n = v.as_f64();
            if n.is_none() {
                tracing::debug!("ignoring non-numeric {}: {}", field, v);
            }
            n
        }
    }
}

const MICROGRAMS_PER_MILLIGRAM: f64 = 1000.0;

fn timestamp(dt: Option<Value>) -> Option<DateTime<Utc>> {
    let secs = number(dt.as_ref(), "dt")?;
    DateTime::from_timestamp(secs as i64, 0)
}

/// Parse a payload document into a batch.
///
/// Every tracked pollutant gets exactly one reading in the batch, absent if
/// upstream did not report it.
pub fn parse(content: &str) -> Result<ReadingBatch, SourceError> {
    let payload: Payload = serde_json::from_str(content)?;
    Ok(payload.into_batch())
}

impl Payload {
    fn into_batch(self) -> ReadingBatch {
        let (pollution_coord, entry) = match self.air_pollution {
            Some(a) => (a.coord, a.list.into_iter().next()),
            None => (None, None),
        };
        let (weather_coord, weather_dt, main) = match self.weather {
            Some(w) => (w.coord, w.dt, w.main.unwrap_or_default()),
            None => (None, None, WeatherMain::default()),
        };

        let mut concentrations: BTreeMap<Pollutant, f64> = BTreeMap::new();
        let mut pollution_dt = None;
        if let Some(entry) = entry {
            pollution_dt = entry.dt;
            for (key, value) in entry.components {
                let pollutant = match key.parse::<Pollutant>() {
                    Ok(p) => p,
                    Err(e) => {
                        tracing::debug!("ignoring component: {}", e);
                        continue;
                    }
                };
                let Some(value) = number(Some(&value), &key) else {
                    continue;
                };
                let value = match pollutant {
                    Pollutant::Co => value / MICROGRAMS_PER_MILLIGRAM,
                    _ => value,
                };
                concentrations.insert(pollutant, value);
            }
        }

        let readings = Pollutant::ALL
            .iter()
            .map(|&pollutant| RawReading {
                pollutant,
                concentration: concentrations.get(&pollutant).copied(),
            })
            .collect();

        ReadingBatch {
            readings,
            temperature: number(main.temp.as_ref(), "main.temp"),
            relative_humidity: number(main.humidity.as_ref(), "main.humidity"),
            pollution_observed_at: timestamp(pollution_dt),
            weather_observed_at: timestamp(weather_dt),
            location: pollution_coord
                .and_then(|c| c.location())
                .or_else(|| weather_coord.and_then(|c| c.location())),
        }
    }
}
