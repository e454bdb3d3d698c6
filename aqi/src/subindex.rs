//! Sub-index calculation by linear interpolation within a breakpoint segment.

use crate::{tables, AqiError, BreakpointTable};

/// Compute the sub-index of a concentration against a table.
///
/// Segments are scanned in table order; the first segment whose inclusive
/// concentration range contains the value is used, and
///
/// ```text
/// index = (index_high - index_low) / (conc_high - conc_low) * (conc - conc_low) + index_low
/// ```
///
/// Returns `Ok(None)` if no segment covers the concentration: negative values,
/// values past the end of the table and values in gaps between bands are all
/// undefined. Nothing is clamped or extrapolated.
///
/// # Examples
///
/// ```
/// use aqi::{sub_index, tables::lookup, Pollutant};
///
/// let pm25 = lookup(Pollutant::Pm25);
/// let index = sub_index(45.0, pm25).unwrap().unwrap();
/// assert!((index - 74.655).abs() < 0.001);
///
/// assert_eq!(sub_index(-1.0, pm25), Ok(None));
/// ```
pub fn sub_index(concentration: f64, table: &BreakpointTable) -> Result<Option<f64>, AqiError> {
    for (i, s) in table.segments().iter().enumerate() {
        if !s.contains(concentration) {
            continue;
        }
        if !(s.conc_high > s.conc_low) {
            return Err(AqiError::DegenerateSegment {
                pollutant: table.pollutant(),
                segment: i,
            });
        }
        // Pin the upper bound so both ends of a segment map exactly onto its index band.
        if concentration == s.conc_high {
            return Ok(Some(s.index_high));
        }
        let index = (s.index_high - s.index_low) / (s.conc_high - s.conc_low)
            * (concentration - s.conc_low)
            + s.index_low;
        return Ok(Some(index.min(s.index_high)));
    }
    tracing::trace!(
        "{} concentration {} not covered by any segment",
        table.pollutant(),
        concentration
    );
    Ok(None)
}

/// Compute a sub-index for a pollutant named by label or provider key,
/// against its reference table.
pub fn compute_sub_index(pollutant: &str, concentration: f64) -> Result<Option<f64>, AqiError> {
    sub_index(concentration, tables::lookup_id(pollutant)?)
}
