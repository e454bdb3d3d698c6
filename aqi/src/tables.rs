//! Breakpoint tables.
//!
//! Each pollutant's table maps concentration bands onto the index bands
//! 0-50, 51-100, 101-200, 201-300, 301-400 and 401-500.
//! Concentration bounds are inclusive; a concentration that lies between two
//! bands (e.g. PM2.5 at 30.5) is not covered by the table.

use std::borrow::Cow;

use crate::{AqiError, Pollutant};

/// One band of a breakpoint table:
/// concentrations in `[conc_low, conc_high]` map linearly onto `[index_low, index_high]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub index_low: f64,
    pub index_high: f64,
    pub conc_low: f64,
    pub conc_high: f64,
}

impl Segment {
    pub const fn new(index_low: f64, index_high: f64, conc_low: f64, conc_high: f64) -> Self {
        Segment {
            index_low,
            index_high,
            conc_low,
            conc_high,
        }
    }

    /// True iff the concentration lies within this segment, bounds included.
    pub fn contains(&self, concentration: f64) -> bool {
        concentration >= self.conc_low && concentration <= self.conc_high
    }
}

/// Ordered segments for one pollutant.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakpointTable {
    pollutant: Pollutant,
    segments: Cow<'static, [Segment]>,
}

impl BreakpointTable {
    const fn from_static(pollutant: Pollutant, segments: &'static [Segment]) -> Self {
        BreakpointTable {
            pollutant,
            segments: Cow::Borrowed(segments),
        }
    }

    /// Build a table from arbitrary segments.
    ///
    /// The segments are not checked; call [`BreakpointTable::validate`] before use.
    pub fn from_segments(pollutant: Pollutant, segments: Vec<Segment>) -> Self {
        BreakpointTable {
            pollutant,
            segments: Cow::Owned(segments),
        }
    }

    pub fn pollutant(&self) -> Pollutant {
        self.pollutant
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Highest concentration covered by the table, if it has any segments.
    pub fn max_concentration(&self) -> Option<f64> {
        self.segments.last().map(|s| s.conc_high)
    }

    /// Check the table invariants: every segment spans a non-empty
    /// concentration and index range, and segments ascend without overlap.
    /// A boundary value shared by adjacent segments is allowed.
    pub fn validate(&self) -> Result<(), AqiError> {
        let pollutant = self.pollutant;
        let mut previous: Option<&Segment> = None;
        for (segment, s) in self.segments.iter().enumerate() {
            if !(s.conc_high > s.conc_low) || !(s.index_high > s.index_low) {
                return Err(AqiError::DegenerateSegment { pollutant, segment });
            }
            if let Some(p) = previous {
                if s.conc_low < p.conc_high || s.index_low < p.index_high {
                    return Err(AqiError::MisorderedSegments { pollutant, segment });
                }
            }
            previous = Some(s);
        }
        Ok(())
    }
}

const PM25: &[Segment] = &[
    Segment::new(0.0, 50.0, 0.0, 30.0),
    Segment::new(51.0, 100.0, 31.0, 60.0),
    Segment::new(101.0, 200.0, 61.0, 90.0),
    Segment::new(201.0, 300.0, 91.0, 120.0),
    Segment::new(301.0, 400.0, 121.0, 250.0),
    Segment::new(401.0, 500.0, 251.0, 500.0),
];

const PM10: &[Segment] = &[
    Segment::new(0.0, 50.0, 0.0, 50.0),
    Segment::new(51.0, 100.0, 51.0, 100.0),
    Segment::new(101.0, 200.0, 101.0, 250.0),
    Segment::new(201.0, 300.0, 251.0, 350.0),
    Segment::new(301.0, 400.0, 351.0, 430.0),
    Segment::new(401.0, 500.0, 431.0, 600.0),
];

const NO2: &[Segment] = &[
    Segment::new(0.0, 50.0, 0.0, 40.0),
    Segment::new(51.0, 100.0, 41.0, 80.0),
    Segment::new(101.0, 200.0, 81.0, 180.0),
    Segment::new(201.0, 300.0, 181.0, 280.0),
    Segment::new(301.0, 400.0, 281.0, 400.0),
    Segment::new(401.0, 500.0, 401.0, 540.0),
];

const SO2: &[Segment] = &[
    Segment::new(0.0, 50.0, 0.0, 40.0),
    Segment::new(51.0, 100.0, 41.0, 80.0),
    Segment::new(101.0, 200.0, 81.0, 380.0),
    Segment::new(201.0, 300.0, 381.0, 800.0),
    Segment::new(301.0, 400.0, 801.0, 1600.0),
    Segment::new(401.0, 500.0, 1601.0, 2100.0),
];

// mg/m³, unlike the others.
const CO: &[Segment] = &[
    Segment::new(0.0, 50.0, 0.0, 1.0),
    Segment::new(51.0, 100.0, 1.1, 2.0),
    Segment::new(101.0, 200.0, 2.1, 10.0),
    Segment::new(201.0, 300.0, 10.1, 17.0),
    Segment::new(301.0, 400.0, 17.1, 34.0),
    Segment::new(401.0, 500.0, 34.1, 50.0),
];

const O3: &[Segment] = &[
    Segment::new(0.0, 50.0, 0.0, 50.0),
    Segment::new(51.0, 100.0, 51.0, 100.0),
    Segment::new(101.0, 200.0, 101.0, 168.0),
    Segment::new(201.0, 300.0, 169.0, 208.0),
    Segment::new(301.0, 400.0, 209.0, 748.0),
    Segment::new(401.0, 500.0, 749.0, 1000.0),
];

static TABLES: [BreakpointTable; 6] = [
    BreakpointTable::from_static(Pollutant::Pm25, PM25),
    BreakpointTable::from_static(Pollutant::Pm10, PM10),
    BreakpointTable::from_static(Pollutant::No2, NO2),
    BreakpointTable::from_static(Pollutant::So2, SO2),
    BreakpointTable::from_static(Pollutant::Co, CO),
    BreakpointTable::from_static(Pollutant::O3, O3),
];

/// The reference table for a pollutant.
pub fn lookup(pollutant: Pollutant) -> &'static BreakpointTable {
    let table = match pollutant {
        Pollutant::Pm25 => &TABLES[0],
        Pollutant::Pm10 => &TABLES[1],
        Pollutant::No2 => &TABLES[2],
        Pollutant::So2 => &TABLES[3],
        Pollutant::Co => &TABLES[4],
        Pollutant::O3 => &TABLES[5],
    };
    debug_assert_eq!(table.pollutant, pollutant);
    table
}

/// The reference table for a pollutant named by label or provider key.
pub fn lookup_id(id: &str) -> Result<&'static BreakpointTable, AqiError> {
    Ok(lookup(id.parse()?))
}

/// Validate every reference table.
/// Intended to run once at startup; a failure here is a build defect.
pub fn validate_all() -> Result<(), AqiError> {
    for table in TABLES.iter() {
        table.validate()?;
        tracing::trace!(
            "validated {} table: {} segments up to {:?} {}",
            table.pollutant,
            table.segments.len(),
            table.max_concentration(),
            table.pollutant.unit()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_tables_are_valid() {
        validate_all().expect("reference tables should validate");
    }

    #[test]
    fn six_segments_each() {
        for p in Pollutant::ALL {
            let table = lookup(p);
            assert_eq!(table.pollutant(), p);
            assert_eq!(table.segments().len(), 6, "{p}");
            assert_eq!(table.segments()[0].conc_low, 0.0);
            assert_eq!(table.segments()[0].index_low, 0.0);
            assert_eq!(table.segments()[5].index_high, 500.0);
        }
    }

    #[test]
    fn index_bands_are_shared() {
        let bands: Vec<(f64, f64)> = lookup(Pollutant::Pm25)
            .segments()
            .iter()
            .map(|s| (s.index_low, s.index_high))
            .collect();
        for p in Pollutant::ALL {
            let other: Vec<(f64, f64)> = lookup(p)
                .segments()
                .iter()
                .map(|s| (s.index_low, s.index_high))
                .collect();
            assert_eq!(bands, other, "{p}");
        }
    }

    #[test]
    fn lookup_by_id() {
        let table = lookup_id("so2").expect("so2 is tracked");
        assert_eq!(table.max_concentration(), Some(2100.0));

        assert_eq!(
            lookup_id("benzene").unwrap_err(),
            AqiError::UnknownPollutant("benzene".to_owned())
        );
    }

    #[test]
    fn degenerate_segment() {
        let table = BreakpointTable::from_segments(
            Pollutant::Pm25,
            vec![
                Segment::new(0.0, 50.0, 0.0, 30.0),
                Segment::new(51.0, 100.0, 31.0, 31.0),
            ],
        );
        assert_eq!(
            table.validate(),
            Err(AqiError::DegenerateSegment {
                pollutant: Pollutant::Pm25,
                segment: 1
            })
        );
    }

    #[test]
    fn misordered_segments() {
        let table = BreakpointTable::from_segments(
            Pollutant::O3,
            vec![
                Segment::new(0.0, 50.0, 0.0, 50.0),
                Segment::new(51.0, 100.0, 40.0, 100.0),
            ],
        );
        assert_eq!(
            table.validate(),
            Err(AqiError::MisorderedSegments {
                pollutant: Pollutant::O3,
                segment: 1
            })
        );
    }

    #[test]
    fn shared_boundary_is_allowed() {
        let table = BreakpointTable::from_segments(
            Pollutant::Co,
            vec![
                Segment::new(0.0, 50.0, 0.0, 1.0),
                Segment::new(51.0, 100.0, 1.0, 2.0),
            ],
        );
        assert_eq!(table.validate(), Ok(()));
    }
}
