//! Folding sub-indices into an overall index, and naming the result.

use std::{collections::BTreeMap, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::Pollutant;

/// Qualitative air quality category of an overall index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Good,
    Satisfactory,
    Moderate,
    Poor,
    VeryPoor,
    Severe,
    /// No sub-index could be computed.
    Unknown,
}

impl Category {
    /// Human-readable name, e.g. "Very Poor".
    pub fn label(&self) -> &'static str {
        match self {
            Category::Good => "Good",
            Category::Satisfactory => "Satisfactory",
            Category::Moderate => "Moderate",
            Category::Poor => "Poor",
            Category::VeryPoor => "Very Poor",
            Category::Severe => "Severe",
            Category::Unknown => "Unknown",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// Categorize an overall index. Upper bounds are inclusive.
pub fn classify(index: Option<f64>) -> Category {
    let Some(index) = index else {
        return Category::Unknown;
    };
    if index <= 50.0 {
        Category::Good
    } else if index <= 100.0 {
        Category::Satisfactory
    } else if index <= 200.0 {
        Category::Moderate
    } else if index <= 300.0 {
        Category::Poor
    } else if index <= 400.0 {
        Category::VeryPoor
    } else {
        Category::Severe
    }
}

/// Health guidance for an overall index.
///
/// This uses its own ladder (50, 100, 150, 200, 300), which does not line up
/// with the [`Category`] bands: e.g. 160 is `Moderate` but gets the advice
/// for the 151-200 step, and everything above 300 shares one message.
pub fn advisory(index: Option<f64>) -> &'static str {
    let Some(index) = index else {
        return "No data";
    };
    if index <= 50.0 {
        "No symptoms: Air quality is good"
    } else if index <= 100.0 {
        "Mild irritation: Sensitive individuals may feel slight discomfort"
    } else if index <= 150.0 {
        "Coughing, throat irritation: People with asthma may experience breathing difficulty"
    } else if index <= 200.0 {
        "Respiratory issues: People may start experiencing fatigue or chest discomfort"
    } else if index <= 300.0 {
        "Severe breathing problems: Avoid outdoor activities"
    } else {
        "Health emergency: Everyone may experience serious effects"
    }
}

/// The combined index of a set of sub-indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aggregate {
    /// The largest sub-index, or `None` if there were none.
    pub overall_index: Option<f64>,
    /// Pollutant that produced `overall_index`.
    /// Ties go to the pollutant that comes first in reporting order.
    pub dominant: Option<Pollutant>,
    pub category: Category,
}

/// Combine sub-indices by taking the worst (largest) one.
pub fn aggregate(sub_indices: &BTreeMap<Pollutant, f64>) -> Aggregate {
    let mut worst: Option<(Pollutant, f64)> = None;
    for (&pollutant, &value) in sub_indices {
        match worst {
            Some((_, w)) if value <= w => {}
            _ => worst = Some((pollutant, value)),
        }
    }
    let overall_index = worst.map(|(_, v)| v);
    Aggregate {
        overall_index,
        dominant: worst.map(|(p, _)| p),
        category: classify(overall_index),
    }
}
