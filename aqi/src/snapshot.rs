//! Raw readings in, derived snapshots out.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{advisory, aggregate, sub_index, tables, Category, Pollutant};

/// Geographic position the readings were taken for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

/// A single pollutant reading from upstream.
/// `None` means the source did not report this pollutant; it is never zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawReading {
    pub pollutant: Pollutant,
    pub concentration: Option<f64>,
}

/// Everything one fetch cycle produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingBatch {
    pub readings: Vec<RawReading>,

    /// Temperature in degrees Celsius.
    pub temperature: Option<f64>,

    /// Relative humidity as a percentage (i.e. range 0.0 to 100.0).
    pub relative_humidity: Option<f64>,

    /// When upstream observed the pollutant concentrations.
    pub pollution_observed_at: Option<DateTime<Utc>>,

    /// When upstream observed the weather.
    pub weather_observed_at: Option<DateTime<Utc>>,

    pub location: Option<Location>,
}

impl ReadingBatch {
    /// Add a present reading.
    pub fn with(mut self, pollutant: Pollutant, concentration: f64) -> Self {
        self.readings.push(RawReading {
            pollutant,
            concentration: Some(concentration),
        });
        self
    }

    /// Add an explicitly-absent reading.
    pub fn without(mut self, pollutant: Pollutant) -> Self {
        self.readings.push(RawReading {
            pollutant,
            concentration: None,
        });
        self
    }
}

/// The derived air quality picture from one batch of readings.
///
/// Snapshots are never modified after construction; a newer one replaces them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    captured_at: DateTime<Utc>,
    pollution_observed_at: Option<DateTime<Utc>>,
    weather_observed_at: Option<DateTime<Utc>>,
    location: Option<Location>,
    readings: BTreeMap<Pollutant, Option<f64>>,
    sub_indices: BTreeMap<Pollutant, f64>,
    overall_index: Option<f64>,
    dominant: Option<Pollutant>,
    category: Category,
    advisory: &'static str,
    temperature: Option<f64>,
    relative_humidity: Option<f64>,
}

impl Snapshot {
    /// Compute a snapshot from a batch.
    ///
    /// Each pollutant is handled on its own: one absent, out-of-range or
    /// failing reading leaves that pollutant without a sub-index and does not
    /// affect the others. A batch with no usable readings still produces a
    /// snapshot, with no overall index and an `Unknown` category.
    pub fn compute(batch: &ReadingBatch, captured_at: DateTime<Utc>) -> Self {
        let mut readings: BTreeMap<Pollutant, Option<f64>> =
            Pollutant::ALL.iter().map(|&p| (p, None)).collect();
        for r in &batch.readings {
            if let Some(previous) = readings.insert(r.pollutant, r.concentration).flatten() {
                tracing::debug!(
                    "duplicate {} reading; replacing {} with {:?}",
                    r.pollutant,
                    previous,
                    r.concentration
                );
            }
        }

        let mut sub_indices = BTreeMap::new();
        for (&pollutant, &concentration) in &readings {
            let Some(concentration) = concentration else {
                continue;
            };
            match sub_index(concentration, tables::lookup(pollutant)) {
                Ok(Some(v)) => {
                    sub_indices.insert(pollutant, v);
                }
                Ok(None) => {
                    tracing::debug!(
                        "{} concentration {} {} is outside the breakpoint table",
                        pollutant,
                        concentration,
                        pollutant.unit()
                    );
                }
                Err(e) => tracing::warn!("skipping {}: {}", pollutant, e),
            }
        }

        let agg = aggregate(&sub_indices);
        Snapshot {
            captured_at,
            pollution_observed_at: batch.pollution_observed_at,
            weather_observed_at: batch.weather_observed_at,
            location: batch.location,
            readings,
            sub_indices,
            overall_index: agg.overall_index,
            dominant: agg.dominant,
            category: agg.category,
            advisory: advisory(agg.overall_index),
            temperature: batch.temperature,
            relative_humidity: batch.relative_humidity,
        }
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn pollution_observed_at(&self) -> Option<DateTime<Utc>> {
        self.pollution_observed_at
    }

    pub fn weather_observed_at(&self) -> Option<DateTime<Utc>> {
        self.weather_observed_at
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Raw concentration for each tracked pollutant; `None` if not reported.
    pub fn readings(&self) -> &BTreeMap<Pollutant, Option<f64>> {
        &self.readings
    }

    /// Sub-indices; only pollutants with a defined sub-index are present.
    pub fn sub_indices(&self) -> &BTreeMap<Pollutant, f64> {
        &self.sub_indices
    }

    pub fn overall_index(&self) -> Option<f64> {
        self.overall_index
    }

    pub fn dominant(&self) -> Option<Pollutant> {
        self.dominant
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Health guidance text for the overall index.
    pub fn advisory(&self) -> &'static str {
        self.advisory
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    pub fn relative_humidity(&self) -> Option<f64> {
        self.relative_humidity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn absent_is_not_zero() {
        let batch = ReadingBatch::default()
            .with(Pollutant::Pm25, 45.0)
            .without(Pollutant::Pm10);
        let s = Snapshot::compute(&batch, at(0));

        assert_eq!(s.readings().len(), 6);
        assert_eq!(s.readings()[&Pollutant::Pm10], None);
        assert_eq!(s.readings()[&Pollutant::O3], None);
        assert!(!s.sub_indices().contains_key(&Pollutant::Pm10));
        assert_eq!(s.sub_indices().len(), 1);
        assert_eq!(s.dominant(), Some(Pollutant::Pm25));
        assert_eq!(s.category(), Category::Satisfactory);
    }

    #[test]
    fn out_of_range_pollutant_does_not_block_others() {
        let batch = ReadingBatch::default()
            .with(Pollutant::Pm25, -3.0)
            .with(Pollutant::So2, 5000.0)
            .with(Pollutant::No2, 40.0);
        let s = Snapshot::compute(&batch, at(0));

        assert_eq!(s.readings()[&Pollutant::Pm25], Some(-3.0));
        assert_eq!(s.sub_indices().keys().copied().collect::<Vec<_>>(), vec![Pollutant::No2]);
        assert_eq!(s.overall_index(), Some(50.0));
        assert_eq!(s.category(), Category::Good);
    }

    #[test]
    fn nothing_usable_is_still_a_snapshot() {
        let batch = ReadingBatch {
            temperature: Some(21.5),
            relative_humidity: Some(40.0),
            ..Default::default()
        }
        .with(Pollutant::Pm10, 9999.0);
        let s = Snapshot::compute(&batch, at(5));

        assert_eq!(s.overall_index(), None);
        assert_eq!(s.dominant(), None);
        assert_eq!(s.category(), Category::Unknown);
        assert_eq!(s.advisory(), "No data");
        assert_eq!(s.temperature(), Some(21.5));
        assert_eq!(s.relative_humidity(), Some(40.0));
        assert_eq!(s.captured_at(), at(5));
    }

    #[test]
    fn dominant_pollutant_drives_the_index() {
        let batch = ReadingBatch::default()
            .with(Pollutant::Pm25, 20.0)
            .with(Pollutant::Pm10, 300.0)
            .with(Pollutant::Co, 0.5);
        let s = Snapshot::compute(&batch, at(0));

        assert_eq!(s.dominant(), Some(Pollutant::Pm10));
        let pm10 = s.sub_indices()[&Pollutant::Pm10];
        assert_eq!(s.overall_index(), Some(pm10));
        assert_eq!(s.category(), Category::Poor);
    }

    #[test]
    fn later_duplicate_reading_wins() {
        let batch = ReadingBatch::default()
            .with(Pollutant::O3, 10.0)
            .with(Pollutant::O3, 50.0);
        let s = Snapshot::compute(&batch, at(0));
        assert_eq!(s.readings()[&Pollutant::O3], Some(50.0));
        assert_eq!(s.sub_indices()[&Pollutant::O3], 50.0);
    }

    #[test]
    fn serializes_to_json() {
        let batch = ReadingBatch {
            location: Some(Location {
                lat: 28.4,
                lon: 77.3,
            }),
            ..Default::default()
        }
        .with(Pollutant::Pm10, 100.0);
        let s = Snapshot::compute(&batch, at(0));
        let v = serde_json::to_value(&s).unwrap();

        assert_eq!(v["overall_index"], 100.0);
        assert_eq!(v["category"], "Satisfactory");
        assert_eq!(v["dominant"], "PM10");
        assert_eq!(v["sub_indices"]["PM10"], 100.0);
        assert!(v["readings"]["PM2.5"].is_null());
        assert_eq!(v["location"]["lat"], 28.4);
    }
}
