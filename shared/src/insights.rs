//! Agricultural insight classification and water-stress scoring
//!
//! Every function here is pure: it reads the series it is given and returns
//! a freshly built result. Missing or sentinel-only data never fails, it
//! just suppresses the affected insight or score.

use crate::models::{
    Insight, InsightCategory, InsightReport, SensorBundle, TimeSeries, UnavailableEntry,
    ValidityResult, WaterStressScore, WeatherParameter,
};

/// Marker the provider uses for a missing sample
pub const MISSING_VALUE: f64 = -999.0;

/// Offset between Kelvin and degrees Celsius
pub const KELVIN_OFFSET: f64 = 273.15;

/// Reason recorded for a series made only of sentinel values
pub const SENTINEL_ONLY_REASON: &str = "All values are 0.00 or -999";

/// Reason recorded for a series with no samples at all
pub const NO_DATA_REASON: &str = "no data";

/// True for the values treated as "no data": the `-999` marker and a literal `0`
///
/// A measured zero (a dry or calm hour) is indistinguishable from missing
/// data here and is dropped along with the marker.
pub fn is_sentinel(value: f64) -> bool {
    value == 0.0 || value == MISSING_VALUE
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Decide whether a series has anything worth classifying
pub fn validate(series: &TimeSeries) -> ValidityResult {
    let mut present = series.present_values().peekable();

    if present.peek().is_none() {
        return ValidityResult::invalid(NO_DATA_REASON);
    }

    if present.all(is_sentinel) {
        ValidityResult::invalid(SENTINEL_ONLY_REASON)
    } else {
        ValidityResult::valid()
    }
}

/// Mean of the non-sentinel samples, or `None` when none remain
pub fn average_valid(series: &TimeSeries) -> Option<f64> {
    let (sum, count) = series
        .present_values()
        .filter(|v| !is_sentinel(*v))
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn insight(category: InsightCategory, label: &str, technical: String, reason: &str) -> Insight {
    Insight {
        insight: label.to_string(),
        technical,
        reason: reason.to_string(),
        category,
    }
}

/// Classify a mean temperature already converted to °C
///
/// Means in [10, 15) fall between the cold and optimal bands and produce
/// no insight.
pub fn classify_temperature(avg_celsius: f64) -> Option<Insight> {
    let technical = format!("Average temperature: {:.1}°C", avg_celsius);
    let category = WeatherParameter::Temperature.category();

    if avg_celsius > 30.0 {
        Some(insight(
            category,
            "Extreme heat",
            technical,
            "Extreme heat can cause heat stress in crops, reduce pollination, and increase water demand. Consider shade cloth, misting systems, and increased irrigation.",
        ))
    } else if avg_celsius > 25.0 {
        Some(insight(
            category,
            "Warm conditions",
            technical,
            "Warm temperatures can accelerate crop growth but may increase water needs. Monitor soil moisture and adjust irrigation accordingly.",
        ))
    } else if (15.0..=25.0).contains(&avg_celsius) {
        Some(insight(
            category,
            "Optimal range",
            technical,
            "This temperature range is generally optimal for many crops. Continue with standard agricultural practices and monitor for any sudden changes.",
        ))
    } else if avg_celsius < 10.0 {
        Some(insight(
            category,
            "Cold conditions",
            technical,
            "Cold temperatures can slow plant growth and increase frost risk. Consider using row covers or greenhouses for sensitive crops.",
        ))
    } else {
        None
    }
}

/// Classify mean precipitation in mm/h; [0.5, 2) produces no insight
pub fn classify_precipitation(avg_mm_per_hour: f64) -> Option<Insight> {
    let technical = format!("Average precipitation: {:.2} mm/h", avg_mm_per_hour);
    let category = WeatherParameter::Precipitation.category();

    if avg_mm_per_hour > 10.0 {
        Some(insight(
            category,
            "Heavy precipitation",
            technical,
            "Heavy rainfall may lead to soil erosion and nutrient leaching. Consider implementing drainage systems and using cover crops.",
        ))
    } else if (2.0..=10.0).contains(&avg_mm_per_hour) {
        Some(insight(
            category,
            "Moderate precipitation",
            technical,
            "This level of precipitation is generally beneficial for most crops. Monitor soil moisture levels and adjust irrigation as needed.",
        ))
    } else if avg_mm_per_hour < 0.5 {
        Some(insight(
            category,
            "Low precipitation",
            technical,
            "Low rainfall may require additional irrigation. Consider drought-resistant crops and water conservation techniques.",
        ))
    } else {
        None
    }
}

/// Classify mean wind speed in m/s; every value lands in a band
pub fn classify_wind(avg_meters_per_second: f64) -> Insight {
    let technical = format!("Average wind speed: {:.1} m/s", avg_meters_per_second);
    let category = WeatherParameter::WindSpeed.category();

    if avg_meters_per_second > 10.0 {
        insight(
            category,
            "High",
            technical,
            "High wind speeds can physically damage crops, lead to soil erosion, and increase water loss through evaporation. Implementing windbreaks or selecting wind-resistant crop varieties may help mitigate these effects.",
        )
    } else if avg_meters_per_second >= 4.0 {
        insight(
            category,
            "Moderate",
            technical,
            "Moderate wind speeds can help with air circulation, reducing humidity and disease risk. Ensure proper crop spacing and use of windbreaks can further enhance this effect.",
        )
    } else if avg_meters_per_second >= 1.0 {
        insight(
            category,
            "Light",
            technical,
            "Light wind speeds are generally beneficial for most crops. Monitor for any changes that might affect pollination or disease spread.",
        )
    } else {
        insight(
            category,
            "Very low",
            technical,
            "Very low wind speeds can lead to stagnant air, which may increase humidity levels and promote fungal diseases. Ensuring adequate air circulation and using proper crop management practices can help reduce disease risk.",
        )
    }
}

/// Classify mean relative humidity in percent; [30, 50) produces no insight
pub fn classify_humidity(avg_percent: f64) -> Option<Insight> {
    let technical = format!("Average relative humidity: {:.1}%", avg_percent);
    let category = WeatherParameter::RelativeHumidity.category();

    if avg_percent > 80.0 {
        Some(insight(
            category,
            "High humidity",
            technical,
            "High humidity can increase the risk of fungal diseases. Ensure good air circulation and consider fungicide applications if necessary.",
        ))
    } else if (50.0..=80.0).contains(&avg_percent) {
        Some(insight(
            category,
            "Optimal humidity",
            technical,
            "This humidity range is generally suitable for most crops. Continue monitoring for any sudden changes that might affect plant health.",
        ))
    } else if avg_percent < 30.0 {
        Some(insight(
            category,
            "Low humidity",
            technical,
            "Low humidity can increase water loss through transpiration. Consider increasing irrigation and using mulch to retain soil moisture.",
        ))
    } else {
        None
    }
}

/// Classify mean solar radiation in W/m²; every value lands in a band
pub fn classify_solar(avg_watts_per_sqm: f64) -> Insight {
    let technical = format!("Average solar radiation: {:.1} W/m^2", avg_watts_per_sqm);
    let category = WeatherParameter::SolarRadiation.category();

    if avg_watts_per_sqm > 300.0 {
        insight(
            category,
            "High solar radiation",
            technical,
            "High solar radiation can lead to increased evapotranspiration. Consider shade structures for sensitive crops and adjust irrigation accordingly.",
        )
    } else if avg_watts_per_sqm >= 100.0 {
        insight(
            category,
            "Optimal solar radiation",
            technical,
            "This range of solar radiation is generally beneficial for most crops. Continue with standard agricultural practices and monitor for any sudden changes.",
        )
    } else {
        insight(
            category,
            "Low solar radiation",
            technical,
            "Low solar radiation may slow plant growth. Consider supplemental lighting for greenhouse crops or selecting shade-tolerant varieties for outdoor cultivation.",
        )
    }
}

/// Run one parameter's classifier on its raw (source-unit) mean
pub fn classify_parameter(parameter: WeatherParameter, average: f64) -> Option<Insight> {
    match parameter {
        WeatherParameter::Temperature => classify_temperature(kelvin_to_celsius(average)),
        WeatherParameter::Precipitation => classify_precipitation(average),
        WeatherParameter::WindSpeed => Some(classify_wind(average)),
        WeatherParameter::RelativeHumidity => classify_humidity(average),
        WeatherParameter::SolarRadiation => Some(classify_solar(average)),
    }
}

/// Classify every parameter of a bundle
///
/// Insights come out in parameter order (temperature, precipitation, wind,
/// humidity, solar); unusable series are listed in `unavailable` instead.
pub fn build_insights(bundle: &SensorBundle) -> InsightReport {
    let mut report = InsightReport::default();

    for parameter in WeatherParameter::ALL {
        let series = bundle.series(parameter);
        let validity = validate(series);

        if !validity.is_valid {
            report.unavailable.push(UnavailableEntry {
                param: parameter,
                reason: validity
                    .reason
                    .unwrap_or_else(|| SENTINEL_ONLY_REASON.to_string()),
            });
            continue;
        }

        let found = average_valid(series).and_then(|avg| classify_parameter(parameter, avg));
        if let Some(found) = found {
            report.insights.push(found);
        }
    }

    report
}

/// Score drought pressure from Kelvin temperatures and precipitation
///
/// `raw = (avg °C - 10) - 2 × avg mm/h`, clamped to [0, 10]. Returns `None`
/// unless both series have usable samples.
pub fn compute_water_stress(
    temperature: &TimeSeries,
    precipitation: &TimeSeries,
) -> Option<WaterStressScore> {
    if !validate(temperature).is_valid || !validate(precipitation).is_valid {
        return None;
    }

    let avg_celsius = kelvin_to_celsius(average_valid(temperature)?);
    let avg_precipitation = average_valid(precipitation)?;
    let raw = (avg_celsius - 10.0) - (avg_precipitation * 2.0);

    Some(WaterStressScore::from_raw(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StressBand;

    fn series(values: &[f64]) -> TimeSeries {
        TimeSeries::from_values(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (format!("20240101{:02}", i), *v)),
        )
    }

    fn label(found: Option<Insight>) -> Option<String> {
        found.map(|i| i.insight)
    }

    // ========================================================================
    // Validation and averaging
    // ========================================================================

    #[test]
    fn test_validate_empty_series() {
        assert_eq!(validate(&TimeSeries::new()), ValidityResult::invalid("no data"));
    }

    #[test]
    fn test_validate_absent_samples_only() {
        let mut s = TimeSeries::new();
        s.insert("t1", None);
        s.insert("t2", None);
        assert_eq!(validate(&s), ValidityResult::invalid(NO_DATA_REASON));
    }

    #[test]
    fn test_validate_sentinel_only() {
        let result = validate(&series(&[0.0, -999.0, 0.0]));
        assert!(!result.is_valid);
        assert_eq!(result.reason.as_deref(), Some("All values are 0.00 or -999"));
    }

    #[test]
    fn test_validate_one_real_sample_is_enough() {
        assert!(validate(&series(&[-999.0, 0.0, 0.1])).is_valid);
    }

    #[test]
    fn test_average_skips_sentinels() {
        assert_eq!(average_valid(&series(&[-999.0, 20.0, 22.0, -999.0])), Some(21.0));
    }

    #[test]
    fn test_average_none_when_only_sentinels() {
        assert_eq!(average_valid(&series(&[0.0, -999.0])), None);
        assert_eq!(average_valid(&TimeSeries::new()), None);
    }

    #[test]
    fn test_average_drops_literal_zero() {
        assert_eq!(average_valid(&series(&[0.0, 4.0])), Some(4.0));
    }

    #[test]
    fn test_average_ignores_absent_samples() {
        let mut s = series(&[2.0, 4.0]);
        s.insert("gap", None);
        assert_eq!(average_valid(&s), Some(3.0));
    }

    // ========================================================================
    // Classifiers
    // ========================================================================

    #[test]
    fn test_temperature_bands() {
        assert_eq!(label(classify_temperature(32.0)).as_deref(), Some("Extreme heat"));
        assert_eq!(label(classify_temperature(30.0)).as_deref(), Some("Warm conditions"));
        assert_eq!(label(classify_temperature(25.01)).as_deref(), Some("Warm conditions"));
        assert_eq!(label(classify_temperature(25.0)).as_deref(), Some("Optimal range"));
        assert_eq!(label(classify_temperature(18.0)).as_deref(), Some("Optimal range"));
        assert_eq!(label(classify_temperature(15.0)).as_deref(), Some("Optimal range"));
        assert_eq!(label(classify_temperature(9.99)).as_deref(), Some("Cold conditions"));
        assert_eq!(label(classify_temperature(-20.0)).as_deref(), Some("Cold conditions"));
    }

    #[test]
    fn test_temperature_gap_is_silent() {
        assert!(classify_temperature(12.0).is_none());
        assert!(classify_temperature(10.0).is_none());
        assert!(classify_temperature(14.99).is_none());
    }

    #[test]
    fn test_temperature_technical_text() {
        let found = classify_temperature(27.0).unwrap();
        assert_eq!(found.technical, "Average temperature: 27.0°C");
        assert_eq!(found.category, InsightCategory::Temperature);
    }

    #[test]
    fn test_precipitation_bands() {
        assert_eq!(label(classify_precipitation(10.5)).as_deref(), Some("Heavy precipitation"));
        assert_eq!(label(classify_precipitation(10.0)).as_deref(), Some("Moderate precipitation"));
        assert_eq!(label(classify_precipitation(2.0)).as_deref(), Some("Moderate precipitation"));
        assert_eq!(label(classify_precipitation(0.49)).as_deref(), Some("Low precipitation"));
        assert!(classify_precipitation(0.5).is_none());
        assert!(classify_precipitation(1.99).is_none());
    }

    #[test]
    fn test_precipitation_technical_uses_two_decimals() {
        assert_eq!(
            classify_precipitation(0.1234).unwrap().technical,
            "Average precipitation: 0.12 mm/h"
        );
    }

    #[test]
    fn test_wind_bands_cover_everything() {
        assert_eq!(classify_wind(-5.0).insight, "Very low");
        assert_eq!(classify_wind(0.99).insight, "Very low");
        assert_eq!(classify_wind(1.0).insight, "Light");
        assert_eq!(classify_wind(3.99).insight, "Light");
        assert_eq!(classify_wind(4.0).insight, "Moderate");
        assert_eq!(classify_wind(10.0).insight, "Moderate");
        assert_eq!(classify_wind(10.01).insight, "High");
    }

    #[test]
    fn test_humidity_bands() {
        assert_eq!(label(classify_humidity(85.0)).as_deref(), Some("High humidity"));
        assert_eq!(label(classify_humidity(80.0)).as_deref(), Some("Optimal humidity"));
        assert_eq!(label(classify_humidity(50.0)).as_deref(), Some("Optimal humidity"));
        assert_eq!(label(classify_humidity(29.9)).as_deref(), Some("Low humidity"));
        assert!(classify_humidity(30.0).is_none());
        assert!(classify_humidity(49.9).is_none());
    }

    #[test]
    fn test_solar_bands_cover_everything() {
        assert_eq!(classify_solar(300.1).insight, "High solar radiation");
        assert_eq!(classify_solar(300.0).insight, "Optimal solar radiation");
        assert_eq!(classify_solar(100.0).insight, "Optimal solar radiation");
        assert_eq!(classify_solar(99.9).insight, "Low solar radiation");
        assert_eq!(classify_solar(99.9).category, InsightCategory::Solar);
    }

    // ========================================================================
    // Bundle-level behaviour
    // ========================================================================

    #[test]
    fn test_build_insights_single_temperature() {
        let bundle = SensorBundle {
            temperature: TimeSeries::from_values([("t1", 300.15)]),
            precipitation: TimeSeries::from_values([("t1", 0.0)]),
            wind_speed: TimeSeries::from_values([("t1", 0.0)]),
            relative_humidity: TimeSeries::from_values([("t1", 0.0)]),
            solar_radiation: TimeSeries::from_values([("t1", 0.0)]),
        };

        let report = build_insights(&bundle);

        assert_eq!(report.insights.len(), 1);
        assert_eq!(report.insights[0].insight, "Warm conditions");
        assert_eq!(report.insights[0].technical, "Average temperature: 27.0°C");

        let params: Vec<WeatherParameter> = report.unavailable.iter().map(|u| u.param).collect();
        assert_eq!(
            params,
            vec![
                WeatherParameter::Precipitation,
                WeatherParameter::WindSpeed,
                WeatherParameter::RelativeHumidity,
                WeatherParameter::SolarRadiation,
            ]
        );
        assert!(report.unavailable.iter().all(|u| u.reason == SENTINEL_ONLY_REASON));
    }

    #[test]
    fn test_build_insights_all_unavailable() {
        let report = build_insights(&SensorBundle::default());
        assert!(report.insights.is_empty());
        assert!(report.all_unavailable());
        assert!(report.unavailable.iter().all(|u| u.reason == NO_DATA_REASON));
    }

    #[test]
    fn test_build_insights_skips_gap_without_marking_unavailable() {
        let bundle = SensorBundle {
            temperature: TimeSeries::from_values([("t1", 285.15)]),
            ..Default::default()
        };
        let report = build_insights(&bundle);
        assert!(report.insights.is_empty());
        assert!(!report
            .unavailable
            .iter()
            .any(|u| u.param == WeatherParameter::Temperature));
    }

    #[test]
    fn test_build_insights_category_order() {
        let bundle = SensorBundle {
            solar_radiation: TimeSeries::from_values([("t1", 250.0)]),
            relative_humidity: TimeSeries::from_values([("t1", 60.0)]),
            wind_speed: TimeSeries::from_values([("t1", 5.0)]),
            precipitation: TimeSeries::from_values([("t1", 3.0)]),
            temperature: TimeSeries::from_values([("t1", 293.15)]),
        };
        let categories: Vec<InsightCategory> =
            build_insights(&bundle).insights.iter().map(|i| i.category).collect();
        assert_eq!(
            categories,
            vec![
                InsightCategory::Temperature,
                InsightCategory::Precipitation,
                InsightCategory::Wind,
                InsightCategory::Humidity,
                InsightCategory::Solar,
            ]
        );
    }

    #[test]
    fn test_classifiers_report_parameter_category() {
        let averages = [
            (WeatherParameter::Temperature, 305.15),
            (WeatherParameter::Precipitation, 12.0),
            (WeatherParameter::WindSpeed, 5.0),
            (WeatherParameter::RelativeHumidity, 90.0),
            (WeatherParameter::SolarRadiation, 400.0),
        ];
        for (parameter, average) in averages {
            let found = classify_parameter(parameter, average).unwrap();
            assert_eq!(found.category, parameter.category());
        }
    }

    // ========================================================================
    // Water stress
    // ========================================================================

    #[test]
    fn test_water_stress_high() {
        // 21 °C, 1 mm/h -> (21 - 10) - 2 = 9
        let score = compute_water_stress(&series(&[294.15]), &series(&[1.0])).unwrap();
        assert!((score.score - 9.0).abs() < 1e-9);
        assert_eq!(score.band, StressBand::High);
    }

    #[test]
    fn test_water_stress_clamps_low() {
        let score = compute_water_stress(&series(&[283.15]), &series(&[5.0])).unwrap();
        assert_eq!(score.score, 0.0);
        assert_eq!(score.band, StressBand::Low);
    }

    #[test]
    fn test_water_stress_clamps_high() {
        let score = compute_water_stress(&series(&[318.15]), &series(&[0.1])).unwrap();
        assert_eq!(score.score, 10.0);
    }

    #[test]
    fn test_water_stress_moderate() {
        // 15 °C, 0.5 mm/h -> (15 - 10) - 1 = 4
        let score = compute_water_stress(&series(&[288.15]), &series(&[0.5])).unwrap();
        assert!((score.score - 4.0).abs() < 1e-9);
        assert_eq!(score.band, StressBand::Moderate);
    }

    #[test]
    fn test_water_stress_requires_precipitation() {
        let temperature = series(&[295.15, 296.15]);
        assert!(compute_water_stress(&temperature, &series(&[0.0, -999.0])).is_none());
    }

    #[test]
    fn test_water_stress_requires_temperature() {
        assert!(compute_water_stress(&TimeSeries::new(), &series(&[1.0])).is_none());
    }
}
