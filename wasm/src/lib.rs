//! WebAssembly module for the EekoAI weather explorer
//!
//! Provides client-side computation for:
//! - Insight classification of a fetched weather bundle
//! - Water stress scoring
//! - Date range presets and input validation

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

#[cfg(target_arch = "wasm32")]
fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn warn(_message: &str) {}

fn js_error(message: String) -> JsValue {
    warn(&message);
    JsValue::from_str(&message)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error(format!("Serialization failed: {}", e)))
}

#[cfg(target_arch = "wasm32")]
fn today() -> Option<NaiveDate> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
}

#[cfg(not(target_arch = "wasm32"))]
fn today() -> Option<NaiveDate> {
    Some(chrono::Utc::now().date_naive())
}

fn parse_parameter(name: &str) -> Option<WeatherParameter> {
    WeatherParameter::ALL
        .into_iter()
        .find(|p| p.code() == name || p.key() == name)
}

/// Classify a bundle (`properties.parameter` object) and return the report as JSON
#[wasm_bindgen]
pub fn build_insights_json(bundle_json: &str) -> Result<String, JsValue> {
    let value: Value = serde_json::from_str(bundle_json)
        .map_err(|e| js_error(format!("Invalid bundle JSON: {}", e)))?;
    let bundle = SensorBundle::from_parameter_json(&value).map_err(|e| js_error(e.to_string()))?;

    let report = shared::build_insights(&bundle);
    if report.all_unavailable() {
        warn("No usable weather data in bundle");
    }
    to_json(&report)
}

/// Water stress for Kelvin temperature and precipitation series, or `null`
#[wasm_bindgen]
pub fn compute_water_stress_json(
    temperature_json: &str,
    precipitation_json: &str,
) -> Result<String, JsValue> {
    let parse = |parameter: WeatherParameter, raw: &str| -> Result<TimeSeries, JsValue> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| js_error(format!("Invalid {} JSON: {}", parameter.code(), e)))?;
        TimeSeries::from_json(parameter.code(), &value).map_err(|e| js_error(e.to_string()))
    };

    let temperature = parse(WeatherParameter::Temperature, temperature_json)?;
    let precipitation = parse(WeatherParameter::Precipitation, precipitation_json)?;

    to_json(&shared::compute_water_stress(&temperature, &precipitation))
}

/// Classify one averaged parameter given in its source unit; `null` for a gap band
#[wasm_bindgen]
pub fn classify_parameter_json(parameter: &str, average: f64) -> Result<String, JsValue> {
    let parameter = parse_parameter(parameter)
        .ok_or_else(|| js_error(format!("Unknown weather parameter: {}", parameter)))?;
    to_json(&shared::classify_parameter(parameter, average))
}

/// Convert a Kelvin reading to degrees Celsius
#[wasm_bindgen]
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    shared::kelvin_to_celsius(kelvin)
}

/// Stress band label for a score
#[wasm_bindgen]
pub fn stress_band_label(score: f64) -> String {
    StressBand::from_score(score).to_string()
}

/// Resolve `week`, `month` or `year` to a `{start, end}` range ending today
#[wasm_bindgen]
pub fn date_range_for_preset(preset: &str) -> Result<String, JsValue> {
    let preset: DateRangePreset = preset.parse().map_err(js_error)?;
    let today = today().ok_or_else(|| js_error("Browser clock is out of range".to_string()))?;
    to_json(&preset.resolve(today))
}

/// Demonstration locations as JSON
#[wasm_bindgen]
pub fn preset_locations_json() -> Result<String, JsValue> {
    to_json(&PRESET_LOCATIONS)
}

/// Check map/form coordinates; returns the problem, if any
#[wasm_bindgen]
pub fn check_coordinates(latitude: f64, longitude: f64) -> Option<String> {
    let (Ok(latitude), Ok(longitude)) = (Decimal::try_from(latitude), Decimal::try_from(longitude))
    else {
        return Some("Coordinates must be finite numbers".to_string());
    };
    validate_coordinates(latitude, longitude)
        .err()
        .map(str::to_string)
}

/// Check an uploaded photo before sending it; returns the problem, if any
#[wasm_bindgen]
pub fn check_image(image: &str) -> Option<String> {
    validate_image_data_url(image).err().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_insights_json() {
        let bundle = r#"{
            "T2M": {"2024010100": 305.15},
            "PRECTOTCORR": {"2024010100": 12.0},
            "WS2M": {"2024010100": 0.5},
            "RH2M": {"2024010100": 0.0},
            "ALLSKY_SFC_SW_DWN": {"2024010100": 150.0}
        }"#;

        let report: Value = serde_json::from_str(&build_insights_json(bundle).unwrap()).unwrap();
        let labels: Vec<&str> = report["insights"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["insight"].as_str().unwrap())
            .collect();

        assert_eq!(
            labels,
            vec!["Extreme heat", "Heavy precipitation", "Very low", "Optimal solar radiation"]
        );
        assert_eq!(report["unavailable"][0]["param"], "relativeHumidity");
    }

    #[test]
    fn test_water_stress_json() {
        let score = compute_water_stress_json(r#"{"a": 294.15}"#, r#"{"a": 1.0}"#).unwrap();
        let score: Value = serde_json::from_str(&score).unwrap();
        assert_eq!(score["band"], "High");

        let none = compute_water_stress_json(r#"{"a": 294.15}"#, r#"{"a": -999.0}"#).unwrap();
        assert_eq!(none, "null");
    }

    #[test]
    fn test_classify_parameter_json() {
        let gap = classify_parameter_json("PRECTOTCORR", 1.0).unwrap();
        assert_eq!(gap, "null");

        let wind = classify_parameter_json("windSpeed", 5.0).unwrap();
        let wind: Value = serde_json::from_str(&wind).unwrap();
        assert_eq!(wind["insight"], "Moderate");
    }

    #[test]
    fn test_kelvin_and_band() {
        assert!((kelvin_to_celsius(273.15)).abs() < 1e-9);
        assert_eq!(stress_band_label(3.0), "Low");
        assert_eq!(stress_band_label(6.5), "High");
    }

    #[test]
    fn test_date_range_for_preset() {
        let range = date_range_for_preset("week").unwrap();
        let range: DateRange = serde_json::from_str(&range).unwrap();
        assert_eq!(range.span_days(), 8);
    }

    #[test]
    fn test_checks() {
        assert_eq!(check_coordinates(-1.2921, 36.8219), None);
        assert!(check_coordinates(95.0, 0.0).is_some());
        assert_eq!(check_image(""), Some("No image provided.".to_string()));
        assert_eq!(check_image("data:image/png;base64,QUJD"), None);
    }

    #[test]
    fn test_preset_locations_json() {
        let locations: Value = serde_json::from_str(&preset_locations_json().unwrap()).unwrap();
        assert_eq!(locations.as_array().unwrap().len(), 5);
    }
}
