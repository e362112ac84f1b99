//! Weather time series models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::InsightError;
use crate::models::InsightCategory;

/// The five hourly parameters requested from the weather data provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum WeatherParameter {
    /// 2 m air temperature, delivered in Kelvin
    Temperature,
    /// Bias-corrected precipitation, mm/hour
    Precipitation,
    /// 2 m wind speed, m/s
    WindSpeed,
    /// 2 m relative humidity, percent
    RelativeHumidity,
    /// All-sky surface shortwave downward irradiance, W/m²
    SolarRadiation,
}

impl WeatherParameter {
    /// All parameters, in the order insights are reported
    pub const ALL: [WeatherParameter; 5] = [
        WeatherParameter::Temperature,
        WeatherParameter::Precipitation,
        WeatherParameter::WindSpeed,
        WeatherParameter::RelativeHumidity,
        WeatherParameter::SolarRadiation,
    ];

    /// Parameter code used by the provider
    pub fn code(&self) -> &'static str {
        match self {
            WeatherParameter::Temperature => "T2M",
            WeatherParameter::Precipitation => "PRECTOTCORR",
            WeatherParameter::WindSpeed => "WS2M",
            WeatherParameter::RelativeHumidity => "RH2M",
            WeatherParameter::SolarRadiation => "ALLSKY_SFC_SW_DWN",
        }
    }

    /// camelCase key accepted as an alternative to the provider code
    pub fn key(&self) -> &'static str {
        match self {
            WeatherParameter::Temperature => "temperature",
            WeatherParameter::Precipitation => "precipitation",
            WeatherParameter::WindSpeed => "windSpeed",
            WeatherParameter::RelativeHumidity => "relativeHumidity",
            WeatherParameter::SolarRadiation => "solarRadiation",
        }
    }

    /// Insight category the parameter's classifier reports under
    pub fn category(&self) -> InsightCategory {
        match self {
            WeatherParameter::Temperature => InsightCategory::Temperature,
            WeatherParameter::Precipitation => InsightCategory::Precipitation,
            WeatherParameter::WindSpeed => InsightCategory::Wind,
            WeatherParameter::RelativeHumidity => InsightCategory::Humidity,
            WeatherParameter::SolarRadiation => InsightCategory::Solar,
        }
    }
}

impl std::fmt::Display for WeatherParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherParameter::Temperature => write!(f, "Temperature"),
            WeatherParameter::Precipitation => write!(f, "Precipitation"),
            WeatherParameter::WindSpeed => write!(f, "Wind Speed"),
            WeatherParameter::RelativeHumidity => write!(f, "Relative Humidity"),
            WeatherParameter::SolarRadiation => write!(f, "Solar Radiation"),
        }
    }
}

/// Samples of one parameter keyed by timestamp
///
/// `None` marks a timestamp the provider reported without a value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TimeSeries(pub BTreeMap<String, Option<f64>>);

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from `(timestamp, value)` pairs
    pub fn from_values<K, I>(values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        Self(values.into_iter().map(|(k, v)| (k.into(), Some(v))).collect())
    }

    pub fn insert(&mut self, timestamp: impl Into<String>, value: Option<f64>) {
        self.0.insert(timestamp.into(), value);
    }

    pub fn get(&self, timestamp: &str) -> Option<f64> {
        self.0.get(timestamp).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Values that are present, in timestamp order
    pub fn present_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.values().filter_map(|v| *v)
    }

    /// Parse one parameter's JSON object, rejecting anything that is not a
    /// finite number or `null`
    pub fn from_json(parameter: &str, value: &Value) -> Result<Self, InsightError> {
        let object = value.as_object().ok_or_else(|| InsightError::NotAnObject {
            parameter: parameter.to_string(),
        })?;

        let mut series = BTreeMap::new();
        for (timestamp, raw) in object {
            let sample = match raw {
                Value::Null => None,
                Value::Number(n) => match n.as_f64() {
                    Some(v) if v.is_finite() => Some(v),
                    _ => {
                        return Err(InsightError::InputShape {
                            parameter: parameter.to_string(),
                            timestamp: timestamp.clone(),
                            detail: format!("{} is not a finite number", n),
                        })
                    }
                },
                other => {
                    return Err(InsightError::InputShape {
                        parameter: parameter.to_string(),
                        timestamp: timestamp.clone(),
                        detail: format!("expected a number, found {}", json_type_name(other)),
                    })
                }
            };
            series.insert(timestamp.clone(), sample);
        }

        Ok(Self(series))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The five series returned for one location and date window
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SensorBundle {
    #[serde(rename = "T2M", default)]
    pub temperature: TimeSeries,
    #[serde(rename = "PRECTOTCORR", default)]
    pub precipitation: TimeSeries,
    #[serde(rename = "WS2M", default)]
    pub wind_speed: TimeSeries,
    #[serde(rename = "RH2M", default)]
    pub relative_humidity: TimeSeries,
    #[serde(rename = "ALLSKY_SFC_SW_DWN", default)]
    pub solar_radiation: TimeSeries,
}

impl SensorBundle {
    pub fn series(&self, parameter: WeatherParameter) -> &TimeSeries {
        match parameter {
            WeatherParameter::Temperature => &self.temperature,
            WeatherParameter::Precipitation => &self.precipitation,
            WeatherParameter::WindSpeed => &self.wind_speed,
            WeatherParameter::RelativeHumidity => &self.relative_humidity,
            WeatherParameter::SolarRadiation => &self.solar_radiation,
        }
    }

    pub fn series_mut(&mut self, parameter: WeatherParameter) -> &mut TimeSeries {
        match parameter {
            WeatherParameter::Temperature => &mut self.temperature,
            WeatherParameter::Precipitation => &mut self.precipitation,
            WeatherParameter::WindSpeed => &mut self.wind_speed,
            WeatherParameter::RelativeHumidity => &mut self.relative_humidity,
            WeatherParameter::SolarRadiation => &mut self.solar_radiation,
        }
    }

    /// Build a bundle from the provider's `properties.parameter` object
    ///
    /// Each series may be keyed by its provider code or its camelCase name.
    /// A parameter missing from the object is left empty.
    pub fn from_parameter_json(value: &Value) -> Result<Self, InsightError> {
        let object = value.as_object().ok_or_else(|| InsightError::NotAnObject {
            parameter: "parameter".to_string(),
        })?;

        let mut bundle = SensorBundle::default();
        for parameter in WeatherParameter::ALL {
            let raw = object
                .get(parameter.code())
                .or_else(|| object.get(parameter.key()));
            if let Some(raw) = raw {
                *bundle.series_mut(parameter) = TimeSeries::from_json(parameter.code(), raw)?;
            }
        }

        Ok(bundle)
    }

    /// Union of timestamps across all five series, sorted
    pub fn timestamps(&self) -> Vec<String> {
        let mut all: Vec<String> = WeatherParameter::ALL
            .iter()
            .flat_map(|p| self.series(*p).timestamps().map(str::to_string))
            .collect();
        all.sort();
        all.dedup();
        all
    }
}
