//! Agricultural insight models

use serde::{Deserialize, Serialize};

use crate::models::WeatherParameter;

/// Which weather concern an insight speaks to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InsightCategory {
    Temperature,
    Precipitation,
    Wind,
    Humidity,
    Solar,
}

/// A banded observation about one averaged parameter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insight {
    /// Short band label
    pub insight: String,
    /// The averaged metric, formatted
    pub technical: String,
    /// Explanation and recommendation
    pub reason: String,
    pub category: InsightCategory,
}

/// Whether a series holds any usable samples
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidityResult {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ValidityResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            reason: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// A parameter whose series could not be classified
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnavailableEntry {
    pub param: WeatherParameter,
    pub reason: String,
}

/// Insights for a bundle, in parameter order, plus the parameters skipped
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InsightReport {
    pub insights: Vec<Insight>,
    pub unavailable: Vec<UnavailableEntry>,
}

impl InsightReport {
    /// True when no parameter had usable data
    pub fn all_unavailable(&self) -> bool {
        self.unavailable.len() == WeatherParameter::ALL.len()
    }
}

/// Qualitative water-stress band
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StressBand {
    /// score ≤ 3
    Low,
    /// 3 < score ≤ 6
    Moderate,
    /// score > 6
    High,
}

impl StressBand {
    pub fn from_score(score: f64) -> Self {
        if score <= 3.0 {
            StressBand::Low
        } else if score <= 6.0 {
            StressBand::Moderate
        } else {
            StressBand::High
        }
    }

    pub fn significance(&self) -> &'static str {
        match self {
            StressBand::Low => {
                "Crops are under little drought pressure. Soil moisture is likely adequate for normal growth."
            }
            StressBand::Moderate => {
                "Crops may begin to show stress during the warmest hours, with reduced growth in sensitive varieties."
            }
            StressBand::High => {
                "Crops are under strong drought pressure. Wilting, reduced yield and poor fruit set become likely."
            }
        }
    }

    pub fn precaution(&self) -> &'static str {
        match self {
            StressBand::Low => {
                "Maintain the regular irrigation schedule and keep monitoring conditions."
            }
            StressBand::Moderate => {
                "Check soil moisture regularly and irrigate early in the morning or late in the evening."
            }
            StressBand::High => {
                "Prioritise irrigation, apply mulch to retain soil moisture, and avoid midday field work."
            }
        }
    }
}

impl std::fmt::Display for StressBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StressBand::Low => write!(f, "Low"),
            StressBand::Moderate => write!(f, "Moderate"),
            StressBand::High => write!(f, "High"),
        }
    }
}

/// Heuristic drought-pressure score in [0, 10]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterStressScore {
    pub score: f64,
    pub band: StressBand,
    pub significance: String,
    pub precaution: String,
}

impl WaterStressScore {
    /// Clamp `raw` into [0, 10] and attach its band text
    pub fn from_raw(raw: f64) -> Self {
        let score = raw.clamp(0.0, 10.0);
        let band = StressBand::from_score(score);
        Self {
            score,
            band,
            significance: band.significance().to_string(),
            precaution: band.precaution().to_string(),
        }
    }
}
