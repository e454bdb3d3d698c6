use thiserror::Error;

use crate::Pollutant;

/// An error in looking up or applying a breakpoint table.
///
/// Note that a concentration that falls outside a table is not an error;
/// it yields an undefined (`None`) sub-index.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AqiError {
    #[error("unknown pollutant '{0}'")]
    UnknownPollutant(String),

    #[error("degenerate breakpoint segment {segment} in the {pollutant} table")]
    DegenerateSegment { pollutant: Pollutant, segment: usize },

    #[error("breakpoint segment {segment} in the {pollutant} table is out of order")]
    MisorderedSegments { pollutant: Pollutant, segment: usize },
}
