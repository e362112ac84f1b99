//! Common types used across the platform

use chrono::{Duration, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl GpsCoordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Date range for queries (inclusive on both ends)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range covering the `days` days before `end`
    pub fn trailing_days(end: NaiveDate, days: i64) -> Self {
        Self {
            start: end - Duration::days(days),
            end,
        }
    }

    /// Number of calendar days spanned, counting both ends
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Quick-pick date ranges offered next to the date inputs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DateRangePreset {
    Week,
    Month,
    Year,
}

impl DateRangePreset {
    /// Resolve the preset to a range ending on `today`
    pub fn resolve(self, today: NaiveDate) -> DateRange {
        let start = match self {
            DateRangePreset::Week => Some(today - Duration::days(7)),
            DateRangePreset::Month => today.checked_sub_months(Months::new(1)),
            DateRangePreset::Year => today.checked_sub_months(Months::new(12)),
        };

        DateRange {
            start: start.unwrap_or(today),
            end: today,
        }
    }
}

impl std::str::FromStr for DateRangePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "week" => Ok(DateRangePreset::Week),
            "month" => Ok(DateRangePreset::Month),
            "year" => Ok(DateRangePreset::Year),
            other => Err(format!("Unknown date range preset: {}", other)),
        }
    }
}

/// A named demonstration location
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PresetLocation {
    pub name: &'static str,
    pub subtitle: &'static str,
    pub latitude: &'static str,
    pub longitude: &'static str,
}

/// Climates that make the insight bands easy to compare side by side
pub const PRESET_LOCATIONS: [PresetLocation; 5] = [
    PresetLocation {
        name: "Nairobi, Kenya",
        subtitle: "Tropical savanna climate",
        latitude: "-1.2921",
        longitude: "36.8219",
    },
    PresetLocation {
        name: "Death Valley, USA",
        subtitle: "Extremely hot desert climate",
        latitude: "36.5323",
        longitude: "-116.9325",
    },
    PresetLocation {
        name: "Oymyakon, Russia",
        subtitle: "Subarctic climate, coldest inhabited place",
        latitude: "63.4628",
        longitude: "142.7866",
    },
    PresetLocation {
        name: "Dubai, UAE",
        subtitle: "Hot desert climate",
        latitude: "25.2048",
        longitude: "55.2708",
    },
    PresetLocation {
        name: "Amazon Rainforest, Brazil",
        subtitle: "Tropical rainforest climate",
        latitude: "-3.4653",
        longitude: "-62.2159",
    },
];
