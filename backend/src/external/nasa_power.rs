//! NASA POWER API client for fetching hourly weather data
//!
//! Requests the five parameters the insight engine works on for a point and
//! date window, and hands back a `SensorBundle`.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use shared::{DateRange, GpsCoordinates, SensorBundle, WeatherParameter};

use crate::config::NasaPowerConfig;
use crate::error::{AppError, AppResult};

/// Weather data provider client
#[derive(Clone)]
pub struct NasaPowerClient {
    client: Client,
    base_url: String,
    community: String,
    user: String,
}

/// Top level of a POWER point response
#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: Value,
}

impl NasaPowerClient {
    /// Create a new NasaPowerClient
    pub fn new(config: &NasaPowerConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
            community: config.community.clone(),
            user: config.user.clone(),
        })
    }

    /// Create a new client with custom base URL (for testing)
    #[cfg(test)]
    pub fn with_base_url(base_url: String) -> Self {
        let defaults = NasaPowerConfig::default();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            community: defaults.community,
            user: defaults.user,
        }
    }

    /// Comma-separated parameter codes, in engine order
    fn parameter_list() -> String {
        WeatherParameter::ALL
            .iter()
            .map(|p| p.code())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn hourly_point_url(&self, location: &GpsCoordinates, range: &DateRange) -> String {
        format!(
            "{}/temporal/hourly/point?start={}&end={}&latitude={}&longitude={}&community={}&parameters={}&format=json&user={}&header=true",
            self.base_url,
            range.start.format("%Y%m%d"),
            range.end.format("%Y%m%d"),
            location.latitude,
            location.longitude,
            self.community,
            Self::parameter_list(),
            self.user,
        )
    }

    /// Fetch hourly samples for a location and date window
    pub async fn fetch_hourly(
        &self,
        location: &GpsCoordinates,
        range: &DateRange,
    ) -> AppResult<SensorBundle> {
        let url = self.hourly_point_url(location, range);
        tracing::debug!(%url, "Requesting weather data");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                tracing::warn!("Weather provider unreachable: {}", e);
                AppError::WeatherServiceUnavailable
            } else {
                AppError::WeatherProvider(format!("Request failed: {}", e))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WeatherProvider(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        let data: Value = response.json().await.map_err(|e| {
            AppError::WeatherProvider(format!("Failed to parse weather response: {}", e))
        })?;

        Self::bundle_from_response(data)
    }

    /// Convert a POWER response body into a bundle
    fn bundle_from_response(data: Value) -> AppResult<SensorBundle> {
        let response: PowerResponse = serde_json::from_value(data).map_err(|e| {
            AppError::WeatherProvider(format!("Unexpected weather response layout: {}", e))
        })?;

        Ok(SensorBundle::from_parameter_json(&response.properties.parameter)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_hourly_point_url() {
        let client = NasaPowerClient::with_base_url("https://power.example/api/".to_string());
        let location = GpsCoordinates::new(
            Decimal::from_str("-1.2921").unwrap(),
            Decimal::from_str("36.8219").unwrap(),
        );
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        );

        assert_eq!(
            client.hourly_point_url(&location, &range),
            "https://power.example/api/temporal/hourly/point?start=20240101&end=20240107&latitude=-1.2921&longitude=36.8219&community=re&parameters=T2M,PRECTOTCORR,WS2M,RH2M,ALLSKY_SFC_SW_DWN&format=json&user=demo&header=true"
        );
    }

    #[test]
    fn test_bundle_from_response() {
        let body = json!({
            "type": "Feature",
            "header": {"fill_value": -999.0},
            "properties": {
                "parameter": {
                    "T2M": {"2024010100": 295.15, "2024010101": 296.15},
                    "PRECTOTCORR": {"2024010100": 0.4, "2024010101": -999.0},
                    "WS2M": {"2024010100": 2.5, "2024010101": 3.5},
                    "RH2M": {"2024010100": 60.0, "2024010101": 62.0},
                    "ALLSKY_SFC_SW_DWN": {"2024010100": 0.0, "2024010101": 220.0}
                }
            }
        });

        let bundle = NasaPowerClient::bundle_from_response(body).unwrap();
        assert_eq!(bundle.temperature.len(), 2);
        assert_eq!(bundle.precipitation.get("2024010101"), Some(-999.0));
    }

    #[test]
    fn test_bundle_from_response_rejects_bad_values() {
        let body = json!({
            "properties": {"parameter": {"T2M": {"2024010100": "warm"}}}
        });
        let err = NasaPowerClient::bundle_from_response(body).unwrap_err();
        assert!(matches!(err, AppError::InputShape(_)));
    }

    #[test]
    fn test_bundle_from_response_rejects_missing_properties() {
        let body = json!({"messages": ["bad request"]});
        let err = NasaPowerClient::bundle_from_response(body).unwrap_err();
        assert!(matches!(err, AppError::WeatherProvider(_)));
    }
}
