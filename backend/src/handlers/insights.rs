//! HTTP handlers for the weather explorer

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use shared::{DateRange, DateRangePreset, GpsCoordinates, SensorBundle};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::{AgronomicSummary, InsightService};
use crate::AppState;

/// Location and window for a weather query
///
/// Either `start` and `end` or a `preset` selects the window; with neither,
/// the last week is used.
#[derive(Debug, Deserialize, Validate)]
pub struct InsightQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub preset: Option<DateRangePreset>,
}

impl InsightQuery {
    fn location(&self) -> AppResult<GpsCoordinates> {
        let latitude = Decimal::try_from(self.latitude)
            .map_err(|_| AppError::validation("latitude", "Latitude is not a finite number"))?;
        let longitude = Decimal::try_from(self.longitude)
            .map_err(|_| AppError::validation("longitude", "Longitude is not a finite number"))?;
        Ok(GpsCoordinates::new(latitude, longitude))
    }

    fn date_range(&self, today: NaiveDate) -> AppResult<DateRange> {
        match (self.preset, self.start, self.end) {
            (Some(preset), None, None) => Ok(preset.resolve(today)),
            (Some(_), _, _) => Err(AppError::validation(
                "preset",
                "Use either a preset or explicit start and end dates",
            )),
            (None, Some(start), Some(end)) => Ok(DateRange::new(start, end)),
            (None, None, None) => Ok(DateRangePreset::Week.resolve(today)),
            (None, _, _) => Err(AppError::validation(
                "start",
                "Both start and end dates are required",
            )),
        }
    }

    fn resolve(&self) -> AppResult<(GpsCoordinates, DateRange)> {
        self.validate()?;
        Ok((self.location()?, self.date_range(Utc::now().date_naive())?))
    }
}

/// Fetch weather for a location and summarize it
pub async fn get_location_insights(
    State(state): State<AppState>,
    Query(query): Query<InsightQuery>,
) -> AppResult<Json<AgronomicSummary>> {
    let (location, range) = query.resolve()?;
    let service = InsightService::new(state.weather);
    let summary = service.analyze_location(location, range).await?;
    Ok(Json(summary))
}

/// Summarize a bundle supplied by the caller, keyed by provider codes
pub async fn analyze_bundle(Json(body): Json<Value>) -> AppResult<Json<AgronomicSummary>> {
    let bundle = SensorBundle::from_parameter_json(&body)?;
    Ok(Json(InsightService::analyze_bundle(&bundle)))
}

/// Export the hourly data table for a location as CSV
pub async fn export_weather_csv(
    State(state): State<AppState>,
    Query(query): Query<InsightQuery>,
) -> AppResult<impl IntoResponse> {
    let (location, range) = query.resolve()?;
    let service = InsightService::new(state.weather);
    let bundle = service.fetch_bundle(&location, &range).await?;
    let csv = InsightService::export_csv(&bundle)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"weather-data.csv\"",
            ),
        ],
        csv,
    ))
}
