//! Insight service: fetches weather for a field and runs the insight engine

use serde::Serialize;
use shared::{
    build_insights, compute_water_stress, kelvin_to_celsius, validate_coordinates,
    validate_date_range, DateRange, GpsCoordinates, Insight, SensorBundle, UnavailableEntry,
    WaterStressScore, WeatherParameter, MISSING_VALUE,
};

use crate::error::{AppError, AppResult};
use crate::external::NasaPowerClient;

/// Insight service for weather-driven field advice
#[derive(Clone)]
pub struct InsightService {
    weather_client: NasaPowerClient,
}

/// Everything the weather explorer renders for one query
#[derive(Debug, Clone, Serialize)]
pub struct AgronomicSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GpsCoordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    pub insights: Vec<Insight>,
    pub unavailable: Vec<UnavailableEntry>,
    pub water_stress: Option<WaterStressScore>,
    /// True when no parameter had usable data
    pub data_unavailable: bool,
    /// Number of distinct timestamps in the bundle
    pub samples: usize,
}

impl AgronomicSummary {
    /// Plain-text digest used as model context by the chatbot
    pub fn to_prompt_context(&self) -> String {
        let mut lines = Vec::new();

        if let (Some(location), Some(range)) = (&self.location, &self.date_range) {
            lines.push(format!(
                "Location: latitude {}, longitude {} ({} to {}, {} hourly samples)",
                location.latitude, location.longitude, range.start, range.end, self.samples
            ));
        }

        for insight in &self.insights {
            lines.push(format!("- {}: {}", insight.insight, insight.technical));
        }

        for entry in &self.unavailable {
            lines.push(format!("- {} data unavailable ({})", entry.param, entry.reason));
        }

        if let Some(stress) = &self.water_stress {
            lines.push(format!(
                "- Water stress score: {:.1}/10 ({})",
                stress.score, stress.band
            ));
        }

        lines.join("\n")
    }
}

impl InsightService {
    /// Create a new InsightService
    pub fn new(weather_client: NasaPowerClient) -> Self {
        Self { weather_client }
    }

    /// Run the engine over a bundle the caller already holds
    pub fn analyze_bundle(bundle: &SensorBundle) -> AgronomicSummary {
        let report = build_insights(bundle);
        let water_stress = compute_water_stress(&bundle.temperature, &bundle.precipitation);
        let data_unavailable = report.all_unavailable();

        if data_unavailable {
            tracing::info!("No usable weather data in bundle");
        }

        AgronomicSummary {
            location: None,
            date_range: None,
            insights: report.insights,
            unavailable: report.unavailable,
            water_stress,
            data_unavailable,
            samples: bundle.timestamps().len(),
        }
    }

    /// Fetch the bundle for a field and date window
    pub async fn fetch_bundle(
        &self,
        location: &GpsCoordinates,
        range: &DateRange,
    ) -> AppResult<SensorBundle> {
        validate_coordinates(location.latitude, location.longitude)
            .map_err(|msg| AppError::validation("location", msg))?;
        validate_date_range(range).map_err(|msg| AppError::validation("date_range", msg))?;

        self.weather_client.fetch_hourly(location, range).await
    }

    /// Fetch weather for a field and summarize it
    pub async fn analyze_location(
        &self,
        location: GpsCoordinates,
        range: DateRange,
    ) -> AppResult<AgronomicSummary> {
        let bundle = self.fetch_bundle(&location, &range).await?;
        let mut summary = Self::analyze_bundle(&bundle);

        tracing::info!(
            latitude = %location.latitude,
            longitude = %location.longitude,
            insights = summary.insights.len(),
            unavailable = summary.unavailable.len(),
            "Built agricultural insights"
        );

        summary.location = Some(location);
        summary.date_range = Some(range);
        Ok(summary)
    }

    /// Render the bundle as the hourly data table, temperatures in °C
    ///
    /// Absent samples and the `-999` marker are written as empty cells.
    pub fn export_csv(bundle: &SensorBundle) -> AppResult<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record([
                "timestamp",
                "temperature_c",
                "precipitation_mm_h",
                "wind_speed_m_s",
                "relative_humidity_pct",
                "solar_radiation_w_m2",
            ])
            .map_err(|e| AppError::Internal(format!("Failed to write CSV: {}", e)))?;

        for timestamp in bundle.timestamps() {
            let mut record = vec![timestamp.clone()];
            for parameter in WeatherParameter::ALL {
                let cell = bundle
                    .series(parameter)
                    .get(&timestamp)
                    .filter(|v| *v != MISSING_VALUE)
                    .map(|v| match parameter {
                        WeatherParameter::Temperature => format!("{:.2}", kelvin_to_celsius(v)),
                        _ => format!("{:.2}", v),
                    })
                    .unwrap_or_default();
                record.push(cell);
            }
            writer
                .write_record(&record)
                .map_err(|e| AppError::Internal(format!("Failed to write CSV: {}", e)))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("Failed to finish CSV: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| AppError::Internal(e.to_string()))
    }
}
