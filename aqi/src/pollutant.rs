//! The tracked pollutants.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::AqiError;

/// A pollutant with a breakpoint table.
///
/// Ordering follows the order in which pollutants are reported,
/// which is also the tie-break order for the dominant pollutant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pollutant {
    /// Fine particulate matter, diameter below 2.5 µm.
    #[serde(rename = "PM2.5")]
    Pm25,
    /// Coarse particulate matter, diameter below 10 µm.
    #[serde(rename = "PM10")]
    Pm10,
    /// Nitrogen dioxide.
    #[serde(rename = "NO2")]
    No2,
    /// Sulfur dioxide.
    #[serde(rename = "SO2")]
    So2,
    /// Carbon monoxide.
    #[serde(rename = "CO")]
    Co,
    /// Ozone.
    #[serde(rename = "O3")]
    O3,
}

impl Pollutant {
    /// All tracked pollutants, in reporting order.
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::Co,
        Pollutant::O3,
    ];

    /// Canonical display label, e.g. "PM2.5".
    pub fn label(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::No2 => "NO2",
            Pollutant::So2 => "SO2",
            Pollutant::Co => "CO",
            Pollutant::O3 => "O3",
        }
    }

    /// Unit of the concentrations the breakpoint table expects.
    pub fn unit(&self) -> &'static str {
        match self {
            Pollutant::Co => "mg/m³",
            _ => "µg/m³",
        }
    }
}

impl Display for Pollutant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Pollutant {
    type Err = AqiError;

    /// Accepts canonical labels ("PM2.5") and provider keys ("pm2_5"),
    /// ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let p = match s.trim().to_ascii_lowercase().as_str() {
            "pm2.5" | "pm2_5" | "pm25" => Pollutant::Pm25,
            "pm10" => Pollutant::Pm10,
            "no2" => Pollutant::No2,
            "so2" => Pollutant::So2,
            "co" => Pollutant::Co,
            "o3" => Pollutant::O3,
            _ => return Err(AqiError::UnknownPollutant(s.to_owned())),
        };
        Ok(p)
    }
}
